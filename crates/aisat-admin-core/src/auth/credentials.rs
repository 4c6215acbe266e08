use crate::api::RegistrationRequest;

use super::ValidationError;

/// Remembered login pair, persisted only when the operator opts in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    pub id_number: String,
    pub password: String,
    pub remember: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub id_number: String,
    pub password: String,
    pub remember: bool,
}

impl LoginForm {
    pub fn new(id_number: impl Into<String>, password: impl Into<String>, remember: bool) -> Self {
        Self {
            id_number: id_number.into(),
            password: password.into(),
            remember,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id_number.is_empty() || self.password.is_empty() {
            return Err(ValidationError::MissingCredentials);
        }
        Ok(())
    }

    pub fn to_record(&self) -> CredentialRecord {
        CredentialRecord {
            id_number: self.id_number.clone(),
            password: self.password.clone(),
            remember: self.remember,
        }
    }
}

impl From<CredentialRecord> for LoginForm {
    fn from(record: CredentialRecord) -> Self {
        Self {
            id_number: record.id_number,
            password: record.password,
            remember: record.remember,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    pub full_name: String,
    pub id_number: String,
    pub email: String,
    pub contact_number: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegistrationForm {
    /// All six fields are required and the passwords must match exactly.
    pub fn validate(&self) -> Result<RegistrationRequest, ValidationError> {
        let fields = [
            &self.full_name,
            &self.id_number,
            &self.email,
            &self.contact_number,
            &self.password,
            &self.confirm_password,
        ];
        if fields.iter().any(|f| f.is_empty()) {
            return Err(ValidationError::MissingFields);
        }
        if self.password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }
        Ok(RegistrationRequest {
            full_name: self.full_name.clone(),
            id_no: self.id_number.clone(),
            email: self.email.clone(),
            contact_no: self.contact_number.clone(),
            password: self.password.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration() -> RegistrationForm {
        RegistrationForm {
            full_name: "Jane Cruz".into(),
            id_number: "2021-0001".into(),
            email: "jane@aisat.edu.ph".into(),
            contact_number: "09171234567".into(),
            password: "secret".into(),
            confirm_password: "secret".into(),
        }
    }

    #[test]
    fn test_login_form_requires_both_fields() {
        assert_eq!(
            LoginForm::new("2021-0001", "", false).validate(),
            Err(ValidationError::MissingCredentials)
        );
        assert_eq!(
            LoginForm::new("", "pw", true).validate(),
            Err(ValidationError::MissingCredentials)
        );
        assert!(LoginForm::new("2021-0001", "pw", false).validate().is_ok());
    }

    #[test]
    fn test_registration_maps_wire_fields() {
        let request = registration().validate().unwrap();
        assert_eq!(request.id_no, "2021-0001");
        assert_eq!(request.contact_no, "09171234567");
    }

    #[test]
    fn test_registration_missing_field() {
        let form = RegistrationForm {
            email: String::new(),
            ..registration()
        };
        assert_eq!(form.validate(), Err(ValidationError::MissingFields));
    }

    #[test]
    fn test_registration_password_mismatch() {
        let form = RegistrationForm {
            password: "a".into(),
            confirm_password: "b".into(),
            ..registration()
        };
        assert_eq!(form.validate(), Err(ValidationError::PasswordMismatch));
    }
}
