use lazy_static::lazy_static;
use regex::Regex;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex =
            Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,4}$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub(crate) fn is_valid_age(age: i32) -> bool {
    (1..=100).contains(&age)
}
