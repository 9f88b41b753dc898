//! `{Action}` placeholders in label templates

use crate::error::PromptError;

pub fn placeholder(action: &str) -> String {
    format!("{{{action}}}")
}

/// Puts `replacement` where the action's placeholder sits
pub fn substitute(template: &str, action: &str, replacement: &str) -> Result<String, PromptError> {
    let placeholder = placeholder(action);
    if !template.contains(&placeholder) {
        return Err(PromptError::TemplateMismatch {
            template: template.to_string(),
            placeholder,
        });
    }
    Ok(template.replace(&placeholder, replacement))
}

/// Template with the action's placeholder removed
pub fn strip(template: &str, action: &str) -> String {
    template.replace(&placeholder(action), "")
}
