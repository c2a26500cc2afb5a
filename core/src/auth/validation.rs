use crate::error::AuthError;

/// Registration form as typed by the user.
#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

fn blank(s: &str) -> bool {
    s.trim().is_empty()
}

pub fn check_login(email: &str, password: &str) -> Result<(), AuthError> {
    if blank(email) || blank(password) {
        return Err(AuthError::validation("email and password are required"));
    }
    Ok(())
}

pub fn check_register(form: &RegisterForm) -> Result<(), AuthError> {
    if [&form.name, &form.email, &form.password, &form.confirm_password]
        .iter()
        .any(|f| blank(f))
    {
        return Err(AuthError::validation("please fill in all fields"));
    }
    if form.password != form.confirm_password {
        return Err(AuthError::validation("passwords do not match"));
    }
    Ok(())
}

pub fn check_password(password: &str) -> Result<(), AuthError> {
    if blank(password) {
        return Err(AuthError::validation("password is required"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> RegisterForm {
        RegisterForm {
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            password: "s3cret".to_string(),
            confirm_password: "s3cret".to_string(),
        }
    }

    #[test]
    fn test_login_blank() {
        assert!(check_login("ana@example.com", "pw").is_ok());
        let err = check_login("  ", "pw").unwrap_err();
        assert_eq!(err.to_string(), "email and password are required");
    }

    #[test]
    fn test_register_checks() {
        assert!(check_register(&form()).is_ok());

        let missing = RegisterForm {
            name: String::new(),
            ..form()
        };
        assert_eq!(
            check_register(&missing).unwrap_err().to_string(),
            "please fill in all fields"
        );

        let mismatch = RegisterForm {
            confirm_password: "other".to_string(),
            ..form()
        };
        assert_eq!(
            check_register(&mismatch).unwrap_err().to_string(),
            "passwords do not match"
        );
    }
}
