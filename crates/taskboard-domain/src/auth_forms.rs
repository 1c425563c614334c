//! Sign-in, registration and password recovery forms.

use serde::{Deserialize, Serialize};
use taskboard_core::{FieldErrors, FormField, TextInput};

pub const USER_EXISTS: &str = "User already exists with this email or username.";
pub const EMAIL_TAKEN: &str =
    "User with this email already exists. Please login or use a different email.";
pub const INVALID_RESET_TOKEN: &str = "Invalid reset token";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForgotPassword {
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordReset {
    pub token: String,
    pub new_password: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PasswordStrength {
    Weak,
    Medium,
    Strong,
}

impl PasswordStrength {
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Weak => "Weak password",
            Self::Medium => "Medium strength password",
            Self::Strong => "Strong password",
        }
    }
}

fn has_repeated_run(password: &str) -> bool {
    let chars: Vec<char> = password.chars().collect();
    chars.windows(3).any(|w| w[0] == w[1] && w[1] == w[2])
}

fn has_common_sequence(password: &str) -> bool {
    let lower = password.to_lowercase();
    ["123", "abc", "qwe"].iter().any(|seq| lower.contains(seq))
}

/// Score a password; `None` for an empty one.
pub fn password_strength(password: &str) -> Option<PasswordStrength> {
    if password.is_empty() {
        return None;
    }
    let len = password.chars().count();
    let checks = [
        len >= 8,
        len >= 12,
        password.chars().any(|c| c.is_ascii_lowercase()),
        password.chars().any(|c| c.is_ascii_uppercase()),
        password.chars().any(|c| c.is_ascii_digit()),
        password.chars().any(|c| !c.is_ascii_alphanumeric()),
    ];
    let mut score = checks.iter().filter(|passed| **passed).count() as i32;
    if has_repeated_run(password) {
        score -= 1;
    }
    if has_common_sequence(password) {
        score -= 1;
    }
    Some(match score {
        s if s < 3 => PasswordStrength::Weak,
        s if s < 5 => PasswordStrength::Medium,
        _ => PasswordStrength::Strong,
    })
}

/// `^[^\s@]+@[^\s@]+\.[^\s@]+$`
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    let plain = |part: &str| !part.is_empty() && !part.chars().any(|c| c.is_whitespace() || c == '@');
    if !plain(local) || domain.contains('@') || domain.chars().any(char::is_whitespace) {
        return false;
    }
    // Some dot must have a non-empty label on each side.
    domain
        .char_indices()
        .filter(|(_, c)| *c == '.')
        .any(|(i, _)| i > 0 && i + 1 < domain.len())
}

fn username_error(username: &str, max_message: &'static str) -> Option<&'static str> {
    let len = username.chars().count();
    let mut chars = username.chars();
    let well_formed = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if username.is_empty() {
        Some("Username is required")
    } else if len < 3 {
        Some("Username must be at least 3 characters long")
    } else if len > 50 {
        Some(max_message)
    } else if !well_formed {
        Some("Username can only contain letters, numbers, and underscores")
    } else {
        None
    }
}

fn email_error(email: &str) -> Option<&'static str> {
    if email.is_empty() {
        Some("Email is required")
    } else if email.chars().count() > 254 {
        Some("Email address is too long")
    } else if !is_valid_email(email) {
        Some("Please enter a valid email address")
    } else {
        None
    }
}

fn register_password_error(password: &str) -> Option<&'static str> {
    let len = password.chars().count();
    if password.is_empty() {
        Some("Password is required")
    } else if len < 8 {
        Some("Password must be at least 8 characters long")
    } else if len > 128 {
        Some("Password must be less than 128 characters")
    } else if !password.chars().any(|c| c.is_ascii_lowercase()) {
        Some("Password must contain at least one lowercase letter")
    } else if !password.chars().any(|c| c.is_ascii_uppercase()) {
        Some("Password must contain at least one uppercase letter")
    } else if !password.chars().any(|c| c.is_ascii_digit()) {
        Some("Password must contain at least one number")
    } else if password.chars().all(|c| c.is_ascii_alphanumeric()) {
        Some("Password must contain at least one special character")
    } else {
        None
    }
}

fn confirm_error(password: &str, confirm: &str) -> Option<&'static str> {
    if confirm.is_empty() {
        Some("Please confirm your password")
    } else if password != confirm {
        Some("Passwords do not match")
    } else {
        None
    }
}

pub fn validate_login(username: &str, password: &str) -> Result<Credentials, FieldErrors> {
    let username = username.trim();
    let mut errors = FieldErrors::new();
    if let Some(message) = username_error(username, "Username cannot exceed 50 characters") {
        errors.add(FormField::Username, message);
    }
    let len = password.chars().count();
    if password.is_empty() {
        errors.add(FormField::Password, "Password is required");
    } else if len < 6 {
        errors.add(FormField::Password, "Password must be at least 6 characters long");
    } else if len > 100 {
        errors.add(FormField::Password, "Password cannot exceed 100 characters");
    }
    errors.into_result().map(|()| Credentials {
        username: username.to_string(),
        password: password.to_string(),
    })
}

pub fn validate_registration(
    username: &str,
    email: &str,
    password: &str,
    confirm: &str,
) -> Result<Registration, FieldErrors> {
    let username = username.trim();
    let email = email.trim();
    let mut errors = FieldErrors::new();
    if let Some(message) = username_error(username, "Username must be less than 50 characters") {
        errors.add(FormField::Username, message);
    }
    if let Some(message) = email_error(email) {
        errors.add(FormField::Email, message);
    }
    if let Some(message) = register_password_error(password) {
        errors.add(FormField::Password, message);
    }
    if let Some(message) = confirm_error(password, confirm) {
        errors.add(FormField::ConfirmPassword, message);
    }
    errors.into_result().map(|()| Registration {
        username: username.to_string(),
        email: email.to_lowercase(),
        password: password.to_string(),
    })
}

pub fn validate_forgot_password(email: &str) -> Result<ForgotPassword, FieldErrors> {
    let email = email.trim();
    let mut errors = FieldErrors::new();
    if let Some(message) = email_error(email) {
        errors.add(FormField::Email, message);
    }
    errors.into_result().map(|()| ForgotPassword {
        email: email.to_string(),
    })
}

pub fn validate_reset(
    token: Option<&str>,
    new_password: &str,
    confirm: &str,
) -> Result<PasswordReset, FieldErrors> {
    let mut errors = FieldErrors::new();
    let token = token.map(str::trim).filter(|t| !t.is_empty());
    if token.is_none() {
        errors.add(FormField::Token, INVALID_RESET_TOKEN);
    }
    let len = new_password.chars().count();
    let mixed = new_password.chars().any(|c| c.is_ascii_lowercase())
        && new_password.chars().any(|c| c.is_ascii_uppercase())
        && new_password.chars().any(|c| c.is_ascii_digit());
    if new_password.is_empty() {
        errors.add(FormField::Password, "New password is required");
    } else if len < 6 {
        errors.add(FormField::Password, "Password must be at least 6 characters long");
    } else if len > 100 {
        errors.add(FormField::Password, "Password cannot exceed 100 characters");
    } else if !mixed {
        errors.add(
            FormField::Password,
            "Password must contain at least one uppercase letter, one lowercase letter, and one number",
        );
    }
    if let Some(message) = confirm_error(new_password, confirm) {
        errors.add(FormField::ConfirmPassword, message);
    }
    errors.into_result()?;
    Ok(PasswordReset {
        token: token.unwrap_or_default().to_string(),
        new_password: new_password.to_string(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFormKind {
    Login,
    Register,
    ForgotPassword,
    ResetPassword,
}

impl AuthFormKind {
    pub fn fields(&self) -> &'static [FormField] {
        match self {
            Self::Login => &[FormField::Username, FormField::Password],
            Self::Register => &[
                FormField::Username,
                FormField::Email,
                FormField::Password,
                FormField::ConfirmPassword,
            ],
            Self::ForgotPassword => &[FormField::Email],
            Self::ResetPassword => &[FormField::Password, FormField::ConfirmPassword],
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Login => "Sign in",
            Self::Register => "Create account",
            Self::ForgotPassword => "Password recovery",
            Self::ResetPassword => "Reset password",
        }
    }
}

/// Validated request produced by an [`AuthForm`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthRequest {
    Login(Credentials),
    Register(Registration),
    ForgotPassword(ForgotPassword),
    ResetPassword(PasswordReset),
}

#[derive(Debug, Clone)]
pub struct AuthForm {
    pub kind: AuthFormKind,
    inputs: Vec<(FormField, TextInput)>,
    pub focus: usize,
    pub token: Option<String>,
    pub errors: FieldErrors,
    pub submitting: bool,
}

impl AuthForm {
    pub fn new(kind: AuthFormKind) -> Self {
        Self {
            kind,
            inputs: kind
                .fields()
                .iter()
                .map(|field| (*field, TextInput::new()))
                .collect(),
            focus: 0,
            token: None,
            errors: FieldErrors::new(),
            submitting: false,
        }
    }

    pub fn reset_password(token: Option<String>) -> Self {
        let mut form = Self::new(AuthFormKind::ResetPassword);
        form.token = token;
        form
    }

    pub fn fields(&self) -> impl Iterator<Item = (FormField, &TextInput)> {
        self.inputs.iter().map(|(field, input)| (*field, input))
    }

    pub fn value(&self, field: FormField) -> &str {
        self.inputs
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, input)| input.as_str())
            .unwrap_or("")
    }

    pub fn input_mut(&mut self, field: FormField) -> Option<&mut TextInput> {
        self.inputs
            .iter_mut()
            .find(|(f, _)| *f == field)
            .map(|(_, input)| input)
    }

    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        if let Some(input) = self.input_mut(field) {
            input.set(value);
        }
    }

    pub fn focused_field(&self) -> Option<FormField> {
        self.inputs.get(self.focus).map(|(field, _)| *field)
    }

    pub fn focused_input(&mut self) -> Option<&mut TextInput> {
        self.inputs.get_mut(self.focus).map(|(_, input)| input)
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % self.inputs.len().max(1);
    }

    pub fn focus_prev(&mut self) {
        let len = self.inputs.len().max(1);
        self.focus = (self.focus + len - 1) % len;
    }

    /// Live strength indicator for the registration password.
    pub fn strength(&self) -> Option<PasswordStrength> {
        match self.kind {
            AuthFormKind::Register => password_strength(self.value(FormField::Password)),
            _ => None,
        }
    }

    pub fn submit(&mut self) -> Option<AuthRequest> {
        let result = match self.kind {
            AuthFormKind::Login => validate_login(
                self.value(FormField::Username),
                self.value(FormField::Password),
            )
            .map(AuthRequest::Login),
            AuthFormKind::Register => validate_registration(
                self.value(FormField::Username),
                self.value(FormField::Email),
                self.value(FormField::Password),
                self.value(FormField::ConfirmPassword),
            )
            .map(AuthRequest::Register),
            AuthFormKind::ForgotPassword => {
                validate_forgot_password(self.value(FormField::Email)).map(AuthRequest::ForgotPassword)
            }
            AuthFormKind::ResetPassword => validate_reset(
                self.token.as_deref(),
                self.value(FormField::Password),
                self.value(FormField::ConfirmPassword),
            )
            .map(AuthRequest::ResetPassword),
        };
        match result {
            Ok(request) => {
                self.errors = FieldErrors::new();
                self.submitting = true;
                Some(request)
            }
            Err(errors) => {
                self.errors = errors;
                None
            }
        }
    }

    pub fn finished(&mut self) {
        self.submitting = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_strength_levels() {
        assert_eq!(password_strength(""), None);
        assert_eq!(password_strength("abc"), Some(PasswordStrength::Weak));
        assert_eq!(password_strength("Password1"), Some(PasswordStrength::Medium));
        assert_eq!(password_strength("Tr0ub4dor&3xy"), Some(PasswordStrength::Strong));
        // Repeats and common sequences cost a point each.
        assert_eq!(password_strength("aaa1234!XYZW"), Some(PasswordStrength::Medium));
    }

    #[test]
    fn test_email_shape() {
        assert!(is_valid_email("ann@example.com"));
        assert!(is_valid_email("a@b.c"));
        assert!(!is_valid_email("ann@example"));
        assert!(!is_valid_email("ann example@x.io"));
        assert!(!is_valid_email("@x.io"));
        assert!(!is_valid_email("a@@x.io"));
        assert!(!is_valid_email("a@x."));
    }

    #[test]
    fn test_login_rules() {
        let errors = validate_login("1ab", "12345").unwrap_err();
        assert_eq!(
            errors.get(FormField::Username),
            Some("Username can only contain letters, numbers, and underscores")
        );
        assert_eq!(
            errors.get(FormField::Password),
            Some("Password must be at least 6 characters long")
        );
        let creds = validate_login(" ann ", "secret").unwrap();
        assert_eq!(creds.username, "ann");
    }

    #[test]
    fn test_registration_reports_every_field() {
        let errors = validate_registration("", "bad", "short", "other").unwrap_err();
        assert_eq!(errors.len(), 4);
        assert_eq!(
            errors.get(FormField::ConfirmPassword),
            Some("Passwords do not match")
        );
    }

    #[test]
    fn test_registration_normalizes_email() {
        let reg = validate_registration("ann_1", " Ann@Example.COM ", "Str0ng!pw", "Str0ng!pw").unwrap();
        assert_eq!(reg.email, "ann@example.com");
    }

    #[test]
    fn test_registration_password_needs_special_char() {
        let errors = validate_registration("ann", "a@b.io", "Password1", "Password1").unwrap_err();
        assert_eq!(
            errors.get(FormField::Password),
            Some("Password must contain at least one special character")
        );
    }

    #[test]
    fn test_reset_requires_token() {
        let errors = validate_reset(None, "Secret1", "Secret1").unwrap_err();
        assert_eq!(errors.get(FormField::Token), Some(INVALID_RESET_TOKEN));
        let reset = validate_reset(Some("tok"), "Secret1", "Secret1").unwrap();
        assert_eq!(
            serde_json::to_value(&reset).unwrap()["newPassword"],
            "Secret1"
        );
    }

    #[test]
    fn test_form_submit_and_focus() {
        let mut form = AuthForm::new(AuthFormKind::Login);
        assert_eq!(form.focused_field(), Some(FormField::Username));
        form.focus_prev();
        assert_eq!(form.focused_field(), Some(FormField::Password));
        form.set(FormField::Username, "ann");
        form.set(FormField::Password, "secret");
        match form.submit() {
            Some(AuthRequest::Login(creds)) => assert_eq!(creds.password, "secret"),
            other => panic!("unexpected {other:?}"),
        }
        assert!(form.submitting);
    }
}
