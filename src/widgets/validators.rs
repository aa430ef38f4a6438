pub type ValidationError = String;
pub type Validator = Box<dyn Fn(&str) -> Result<(), ValidationError> + Send + Sync>;

/// Run a list of validators against `value`, returning the first error.
pub fn run_validators(validators: &[Validator], value: &str) -> Result<(), String> {
    for validator in validators {
        validator(value)?;
    }
    Ok(())
}

pub fn required_message(label: &str) -> String {
    if label.is_empty() {
        "This field is required".to_string()
    } else {
        format!("{label} is required")
    }
}

pub fn max_length(max_len: usize) -> Validator {
    Box::new(move |value: &str| {
        if value.chars().count() > max_len {
            Err(format!("At most {max_len} characters are allowed"))
        } else {
            Ok(())
        }
    })
}

/// Finite decimal numbers only: `NaN` and the infinities are rejected.
pub fn numeric() -> Validator {
    Box::new(|value: &str| {
        if matches!(value.trim().parse::<f64>(), Ok(number) if number.is_finite()) {
            Ok(())
        } else {
            Err(format!("{value:?} is not a number"))
        }
    })
}

pub fn email() -> Validator {
    Box::new(|value: &str| match value.split_once('@') {
        Some((user, domain)) if !user.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(format!("{value:?} is not an email address")),
    })
}

pub fn one_of(choices: Vec<String>) -> Validator {
    Box::new(move |value: &str| {
        if choices.iter().any(|choice| choice == value) {
            Ok(())
        } else {
            Err(format!("{value:?} is not an available choice"))
        }
    })
}
