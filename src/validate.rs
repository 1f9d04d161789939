use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\w.-]+@([\w-]+\.)+[\w-]{2,4}$").expect("email pattern is a valid regex")
});

pub const INVALID_EMAIL: &str = "Invalid email";

/// Form-level email check; `Err` carries the message shown under the field.
pub fn email(value: &str) -> Result<(), &'static str> {
    if EMAIL.is_match(value) {
        Ok(())
    } else {
        Err(INVALID_EMAIL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_addresses() {
        assert!(email("jane.doe@example.com").is_ok());
        assert!(email("a-b_c@mail.example.co").is_ok());
    }

    #[test]
    fn rejects_malformed_addresses() {
        for bad in ["", "plain", "no-at.example.com", "x@y", "x@y.toolongtld", "x y@z.com"] {
            assert_eq!(email(bad), Err(INVALID_EMAIL), "{bad}");
        }
    }
}
