use serde::Deserialize;

use super::models::Author;
use crate::validation::{DateField, Rule, TextField, Validated, Validator};

/// Raw author form body. Every field may be missing.
#[derive(Debug, Default, Deserialize)]
pub struct AuthorForm {
    pub first_name: Option<String>,
    pub family_name: Option<String>,
    pub date_of_birth: Option<String>,
    pub date_of_death: Option<String>,
}

const FIRST_NAME: TextField = TextField {
    name: "first_name",
    rules: &[
        Rule::Required {
            message: "First name must be specified.",
        },
        Rule::Alphanumeric {
            message: "First name has non-alphanumeric characters.",
        },
    ],
};

const FAMILY_NAME: TextField = TextField {
    name: "family_name",
    rules: &[
        Rule::Required {
            message: "Family name must be specified.",
        },
        Rule::Alphanumeric {
            message: "Family name has non-alphanumeric characters.",
        },
    ],
};

const DATE_OF_BIRTH: DateField = DateField {
    name: "date_of_birth",
    message: "Invalid date of birth",
};

const DATE_OF_DEATH: DateField = DateField {
    name: "date_of_death",
    message: "Invalid date of death",
};

/// Same rules for create and update.
pub fn validate(form: &AuthorForm) -> Validated<Author> {
    let mut v = Validator::new();
    let author = Author {
        first_name: v.text(&FIRST_NAME, form.first_name.as_deref()),
        family_name: v.text(&FAMILY_NAME, form.family_name.as_deref()),
        date_of_birth: v.date(&DATE_OF_BIRTH, form.date_of_birth.as_deref()),
        date_of_death: v.date(&DATE_OF_DEATH, form.date_of_death.as_deref()),
    };
    v.finish(author)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationErrorKind;
    use chrono::NaiveDate;

    fn form(first: &str, family: &str) -> AuthorForm {
        AuthorForm {
            first_name: Some(first.to_string()),
            family_name: Some(family.to_string()),
            ..AuthorForm::default()
        }
    }

    #[test]
    fn valid_form_produces_trimmed_draft() {
        let mut input = form(" Ada ", "Lovelace");
        input.date_of_birth = Some("1815-12-10".to_string());
        input.date_of_death = Some(String::new());

        let validated = validate(&input);
        assert!(validated.is_valid());
        assert_eq!(
            validated.draft,
            Author {
                first_name: "Ada".to_string(),
                family_name: "Lovelace".to_string(),
                date_of_birth: NaiveDate::from_ymd_opt(1815, 12, 10),
                date_of_death: None,
            }
        );
    }

    #[test]
    fn empty_names_report_two_errors() {
        let validated = validate(&form("", ""));

        let errors: Vec<_> = validated
            .errors
            .iter()
            .map(|e| (e.field, e.kind, e.message.as_str()))
            .collect();
        assert_eq!(
            errors,
            vec![
                (
                    "first_name",
                    ValidationErrorKind::EmptyField,
                    "First name must be specified."
                ),
                (
                    "family_name",
                    ValidationErrorKind::EmptyField,
                    "Family name must be specified."
                ),
            ]
        );
        assert_eq!(validated.draft.first_name, "");
        assert_eq!(validated.draft.family_name, "");
    }

    #[test]
    fn apostrophe_is_not_alphanumeric() {
        let validated = validate(&form("Flann", "O'Brien"));

        assert_eq!(validated.errors.len(), 1);
        assert_eq!(validated.errors[0].field, "family_name");
        assert_eq!(validated.errors[0].kind, ValidationErrorKind::InvalidCharacters);
        assert_eq!(validated.draft.family_name, "O&#x27;Brien");
    }

    #[test]
    fn bad_dates_are_reported_per_field() {
        let mut input = form("Ada", "Lovelace");
        input.date_of_birth = Some("yesterday".to_string());
        input.date_of_death = Some("1852-11-27".to_string());

        let validated = validate(&input);
        assert_eq!(validated.errors.len(), 1);
        assert_eq!(validated.errors[0].message, "Invalid date of birth");
        assert_eq!(validated.draft.date_of_birth, None);
        assert_eq!(
            validated.draft.date_of_death,
            NaiveDate::from_ymd_opt(1852, 11, 27)
        );
    }
}
