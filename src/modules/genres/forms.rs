use serde::Deserialize;

use super::models::Genre;
use crate::validation::{Rule, TextField, Validated, Validator};

#[derive(Debug, Default, Deserialize)]
pub struct GenreForm {
    pub name: Option<String>,
}

const CREATE_NAME: TextField = TextField {
    name: "name",
    rules: &[Rule::Length {
        min: 3,
        max: 100,
        message: "genre must contain atleast 3 characcters",
    }],
};

const UPDATE_NAME: TextField = TextField {
    name: "name",
    rules: &[Rule::Length {
        min: 3,
        max: 100,
        message: "genre must have atleast 3 characters",
    }],
};

pub fn validate_create(form: &GenreForm) -> Validated<Genre> {
    validate(&CREATE_NAME, form)
}

pub fn validate_update(form: &GenreForm) -> Validated<Genre> {
    validate(&UPDATE_NAME, form)
}

fn validate(name: &TextField, form: &GenreForm) -> Validated<Genre> {
    let mut v = Validator::new();
    let genre = Genre {
        name: v.text(name, form.name.as_deref()),
    };
    v.finish(genre)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationErrorKind;

    fn named(name: &str) -> GenreForm {
        GenreForm {
            name: Some(name.to_string()),
        }
    }

    #[test]
    fn short_name_fails_length() {
        let validated = validate_create(&named("ab"));

        assert_eq!(validated.errors.len(), 1);
        assert_eq!(validated.errors[0].kind, ValidationErrorKind::LengthOutOfRange);
        assert_eq!(
            validated.errors[0].message,
            "genre must contain atleast 3 characcters"
        );
    }

    #[test]
    fn update_uses_its_own_message() {
        let validated = validate_update(&named(" x "));
        assert_eq!(validated.errors[0].message, "genre must have atleast 3 characters");
        assert_eq!(validated.draft.name, "x");
    }

    #[test]
    fn punctuation_is_allowed() {
        let validated = validate_create(&named("Sci-Fi!"));
        assert!(validated.is_valid());
        assert_eq!(validated.draft.name, "Sci-Fi!");
    }

    #[test]
    fn overlong_name_fails() {
        let validated = validate_create(&named(&"a".repeat(101)));
        assert_eq!(validated.errors[0].kind, ValidationErrorKind::LengthOutOfRange);
        assert!(validate_create(&named(&"a".repeat(100))).is_valid());
    }

    #[test]
    fn missing_name_fails_length() {
        let validated = validate_create(&GenreForm::default());
        assert_eq!(validated.errors[0].kind, ValidationErrorKind::LengthOutOfRange);
    }
}
