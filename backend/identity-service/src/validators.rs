//! Field validation shared by registration and profile updates

use crate::error::{IdentityError, Result};
use chrono::{Datelike, Utc};

pub const DEPARTMENTS: &[&str] = &["CSE", "EEE", "ECE", "AGRI"];

pub fn validate_department(department: &str) -> Result<()> {
    if DEPARTMENTS.contains(&department) {
        Ok(())
    } else {
        Err(IdentityError::Validation(format!(
            "Unknown department '{department}', expected one of {DEPARTMENTS:?}"
        )))
    }
}

pub fn validate_graduation_year(year: i32) -> Result<()> {
    let current = Utc::now().year();
    if year < 1900 || year > current + 10 {
        return Err(IdentityError::Validation(format!(
            "Graduation year {year} out of range"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_departments_pass() {
        for dept in DEPARTMENTS {
            assert!(validate_department(dept).is_ok());
        }
    }

    #[test]
    fn test_unknown_department_fails() {
        assert!(validate_department("MBA").is_err());
    }

    #[test]
    fn test_graduation_year_bounds() {
        assert!(validate_graduation_year(1899).is_err());
        assert!(validate_graduation_year(2024).is_ok());
        assert!(validate_graduation_year(Utc::now().year() + 11).is_err());
    }
}
