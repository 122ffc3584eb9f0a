use regex::Regex;

use crate::models::{
    CreateConsultationRequest, CreateContactRequest, FieldError, LoginRequest, ServiceRequest,
    SubscribeRequest,
};

/// The consultation form's project catalogue. "Other" unlocks the free-text field.
pub const PROJECT_TYPES: [&str; 5] = [
    "AI Website – Starter",
    "AI Website – Professional",
    "AI Closer Agent",
    "Ultimate Pack",
    "Other",
];

/// Shape check only: one `@` between non-empty, whitespace-free parts and a
/// dotted domain. Deliverability is not our problem.
pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").map_or(false, |re| re.is_match(email))
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Presence plus format check shared by every form that collects an email.
fn check_email(errors: &mut Vec<FieldError>, email: &str) {
    if is_blank(email) {
        errors.push(FieldError::new("email", "Email is required."));
    } else if !valid_email(email.trim()) {
        errors.push(FieldError::new("email", "Invalid email format."));
    }
}

/// Trims every feature line and drops the empties, preserving order.
pub fn normalize_features(features: &[String]) -> Vec<String> {
    features
        .iter()
        .map(|feature| feature.trim().to_string())
        .filter(|feature| !feature.is_empty())
        .collect()
}

pub fn validate_login(payload: &LoginRequest) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if is_blank(&payload.email) {
        errors.push(FieldError::new("email", "Email is required."));
    }
    if payload.password.is_empty() {
        errors.push(FieldError::new("password", "Password is required."));
    }
    errors
}

pub fn validate_contact(payload: &CreateContactRequest) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if is_blank(&payload.name) {
        errors.push(FieldError::new("name", "Name is required."));
    }
    check_email(&mut errors, &payload.email);
    if is_blank(&payload.message) {
        errors.push(FieldError::new("message", "Message is required."));
    }
    errors
}

pub fn validate_consultation(payload: &CreateConsultationRequest) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if is_blank(&payload.full_name) {
        errors.push(FieldError::new("full_name", "Full name is required."));
    }
    check_email(&mut errors, &payload.email);

    if is_blank(&payload.project_type) {
        errors.push(FieldError::new("project_type", "Project type is required."));
    } else if !PROJECT_TYPES.contains(&payload.project_type.trim()) {
        errors.push(FieldError::new("project_type", "Unknown project type."));
    } else if payload.project_type.trim() == "Other"
        && payload.other_project_type.as_deref().map_or(true, is_blank)
    {
        errors.push(FieldError::new(
            "other_project_type",
            "Please specify your project type.",
        ));
    }

    if is_blank(&payload.timeline) {
        errors.push(FieldError::new("timeline", "Timeline is required."));
    }
    errors
}

pub fn validate_subscription(payload: &SubscribeRequest) -> Vec<FieldError> {
    let mut errors = Vec::new();
    check_email(&mut errors, &payload.email);
    errors
}

pub fn validate_service(payload: &ServiceRequest) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if is_blank(&payload.title) {
        errors.push(FieldError::new("title", "Title is required."));
    }
    if normalize_features(&payload.features).is_empty() {
        errors.push(FieldError::new(
            "features",
            "At least one feature is required.",
        ));
    }
    if is_blank(&payload.price) {
        errors.push(FieldError::new("price", "Price is required."));
    }
    if is_blank(&payload.monthly_price) {
        errors.push(FieldError::new(
            "monthly_price",
            "Monthly price is required.",
        ));
    }
    if is_blank(&payload.button_label) {
        errors.push(FieldError::new("button_label", "Button label is required."));
    }
    errors
}
