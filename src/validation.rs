use crate::models::{LeaveRequestInput, LoginRequest, RegisterRequest};
use thiserror::Error;

pub const MIN_PASSWORD_LEN: usize = 6;
const ATTACHMENT_EXTENSIONS: [&str; 4] = ["svg", "png", "jpg", "jpeg"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("password must have at least {} characters", MIN_PASSWORD_LEN)]
    PasswordTooShort,
    #[error("passwords do not match")]
    PasswordMismatch,
    #[error("leave cannot end before it starts")]
    InvertedPeriod,
    #[error("attachment must be one of svg, png, jpg, jpeg")]
    UnsupportedAttachment,
    #[error("month must be YYYY-MM, got {0:?}")]
    InvalidMonth(String),
}

pub fn validate_login(request: &LoginRequest) -> Result<(), ValidationError> {
    if request.username.trim().is_empty() {
        return Err(ValidationError::Required("username"));
    }
    if request.password.is_empty() {
        return Err(ValidationError::Required("password"));
    }
    if request.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort);
    }
    Ok(())
}

pub fn validate_registration(request: &RegisterRequest) -> Result<(), ValidationError> {
    if request.password != request.confirm_password {
        return Err(ValidationError::PasswordMismatch);
    }
    let required = [
        ("full_name", &request.full_name),
        ("cpf", &request.cpf),
        ("username", &request.username),
        ("email", &request.email),
        ("password", &request.password),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(ValidationError::Required(field));
        }
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.trim().is_empty() {
        return Err(ValidationError::Required("email"));
    }
    Ok(())
}

pub fn validate_leave_request(request: &LeaveRequestInput) -> Result<(), ValidationError> {
    if request.end_date < request.start_date {
        return Err(ValidationError::InvertedPeriod);
    }
    if request.justification.trim().is_empty() {
        return Err(ValidationError::Required("justification"));
    }
    if let Some(name) = &request.attachment_name {
        let extension = name.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase());
        match extension {
            Some(ext) if ATTACHMENT_EXTENSIONS.contains(&ext.as_str()) => {}
            _ => return Err(ValidationError::UnsupportedAttachment),
        }
    }
    Ok(())
}

/// Upper-cases the first letter of every word and lower-cases the rest.
pub fn capitalize_each_word(value: &str) -> String {
    value
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn login(username: &str, password: &str) -> LoginRequest {
        LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    fn registration() -> RegisterRequest {
        RegisterRequest {
            full_name: "Carlos Moraes".to_string(),
            cpf: "123.456.789-00".to_string(),
            username: "carlos".to_string(),
            email: "carlos@example.com".to_string(),
            password: "secret1".to_string(),
            confirm_password: "secret1".to_string(),
        }
    }

    fn leave(start: u32, end: u32) -> LeaveRequestInput {
        LeaveRequestInput {
            start_date: NaiveDate::from_ymd_opt(2025, 6, start).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 6, end).unwrap(),
            justification: "consulta médica".to_string(),
            attachment_name: None,
        }
    }

    #[test]
    fn login_requires_username_and_long_password() {
        assert_eq!(
            validate_login(&login("  ", "secret1")),
            Err(ValidationError::Required("username"))
        );
        assert_eq!(
            validate_login(&login("ana", "")),
            Err(ValidationError::Required("password"))
        );
        assert_eq!(
            validate_login(&login("ana", "12345")),
            Err(ValidationError::PasswordTooShort)
        );
        assert!(validate_login(&login("ana", "123456")).is_ok());
    }

    #[test]
    fn registration_checks_confirmation_before_fields() {
        let mut request = registration();
        request.cpf.clear();
        request.confirm_password = "other".to_string();
        assert_eq!(validate_registration(&request), Err(ValidationError::PasswordMismatch));

        request.confirm_password = request.password.clone();
        assert_eq!(validate_registration(&request), Err(ValidationError::Required("cpf")));
        assert!(validate_registration(&registration()).is_ok());
    }

    #[test]
    fn leave_period_must_not_be_inverted() {
        assert_eq!(validate_leave_request(&leave(10, 9)), Err(ValidationError::InvertedPeriod));
        assert!(validate_leave_request(&leave(9, 9)).is_ok());
    }

    #[test]
    fn leave_attachment_extension_is_checked() {
        let mut request = leave(2, 3);
        request.attachment_name = Some("atestado.PNG".to_string());
        assert!(validate_leave_request(&request).is_ok());
        request.attachment_name = Some("atestado.pdf".to_string());
        let err = validate_leave_request(&request).unwrap_err();
        assert_eq!(err, ValidationError::UnsupportedAttachment);
        for extension in ATTACHMENT_EXTENSIONS {
            assert!(err.to_string().contains(extension));
        }
        request.attachment_name = Some("atestado.jpeg".to_string());
        assert!(validate_leave_request(&request).is_ok());
        request.attachment_name = Some("atestado".to_string());
        assert_eq!(validate_leave_request(&request), Err(ValidationError::UnsupportedAttachment));
    }

    #[test]
    fn names_are_capitalized_per_word() {
        assert_eq!(capitalize_each_word("cARLOS moraes"), "Carlos Moraes");
        assert_eq!(capitalize_each_word("élida"), "Élida");
        assert_eq!(capitalize_each_word(""), "");
    }
}
