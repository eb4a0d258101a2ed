use std::str::FromStr;

use super::errors::AuthError;

/// Language used for user-facing outcome messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    En,
    Es,
}

impl Locale {
    /// Shared by both negative outcomes (unknown account and wrong password).
    pub fn invalid_credentials(self) -> &'static str {
        match self {
            Locale::En => "invalid credentials",
            Locale::Es => "Credenciales incorrectas",
        }
    }

    pub fn success(self) -> &'static str {
        match self {
            Locale::En => "success",
            Locale::Es => "Inicio de sesión exitoso",
        }
    }
}

impl FromStr for Locale {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "es" => Ok(Locale::Es),
            other => Err(AuthError::Validation(format!("unsupported locale: {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_locales() {
        assert_eq!("EN".parse::<Locale>().unwrap(), Locale::En);
        assert_eq!(" es ".parse::<Locale>().unwrap(), Locale::Es);
        assert!("fr".parse::<Locale>().is_err());
    }

    #[test]
    fn spanish_messages() {
        assert_eq!(Locale::Es.invalid_credentials(), "Credenciales incorrectas");
        assert_eq!(Locale::En.invalid_credentials(), "invalid credentials");
        assert_eq!(Locale::default().success(), "success");
    }
}
