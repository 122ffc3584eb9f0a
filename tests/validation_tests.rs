use moonlight_api::{
    models::{CreateConsultationRequest, CreateContactRequest, LoginRequest, ServiceRequest},
    validation::{self, PROJECT_TYPES},
};

#[cfg(test)]
mod email_tests {
    use super::*;

    #[test]
    fn test_accepts_plain_addresses() {
        assert!(validation::valid_email("jane@example.com"));
        assert!(validation::valid_email("jane.doe+tag@mail.example.co.uk"));
    }

    #[test]
    fn test_rejects_malformed_addresses() {
        assert!(!validation::valid_email(""));
        assert!(!validation::valid_email("plainaddress"));
        assert!(!validation::valid_email("@no-local-part.com"));
        assert!(!validation::valid_email("two@@example.com"));
        assert!(!validation::valid_email("spaces in@example.com"));
        // No dot in the domain part.
        assert!(!validation::valid_email("jane@localhost"));
    }
}

#[cfg(test)]
mod feature_tests {
    use super::*;

    #[test]
    fn test_normalize_trims_and_drops_empties() {
        let raw = vec![
            " Landing page ".to_string(),
            "".to_string(),
            "  ".to_string(),
            "Chat widget".to_string(),
        ];
        let normalized = validation::normalize_features(&raw);
        assert_eq!(normalized, vec!["Landing page", "Chat widget"]);
    }

    #[test]
    fn test_normalize_preserves_order() {
        let raw = vec!["c".to_string(), "a".to_string(), "b".to_string()];
        assert_eq!(validation::normalize_features(&raw), vec!["c", "a", "b"]);
    }
}

#[cfg(test)]
mod form_tests {
    use super::*;

    fn consultation(project_type: &str, other: Option<&str>) -> CreateConsultationRequest {
        CreateConsultationRequest {
            full_name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            phone: None,
            company: None,
            project_type: project_type.to_string(),
            other_project_type: other.map(|s| s.to_string()),
            timeline: "1-3 months".to_string(),
            description: None,
        }
    }

    #[test]
    fn test_login_blank_password_is_allowed_as_whitespace() {
        // Only a truly empty password is rejected; whitespace could be a
        // legitimate (if unwise) password.
        let payload = LoginRequest {
            email: "admin@moonlight.dev".to_string(),
            password: "   ".to_string(),
        };
        assert!(validation::validate_login(&payload).is_empty());
    }

    #[test]
    fn test_contact_accumulates_all_failures() {
        let payload = CreateContactRequest {
            name: " ".to_string(),
            email: "nope".to_string(),
            message: "".to_string(),
        };
        let errors = validation::validate_contact(&payload);
        assert_eq!(errors.len(), 3);
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "email", "message"]);
    }

    #[test]
    fn test_every_catalogue_entry_passes() {
        for project_type in PROJECT_TYPES {
            let other = if project_type == "Other" {
                Some("Custom CRM")
            } else {
                None
            };
            let errors = validation::validate_consultation(&consultation(project_type, other));
            assert!(errors.is_empty(), "{} should validate", project_type);
        }
    }

    #[test]
    fn test_other_with_blank_detail_fails() {
        let errors = validation::validate_consultation(&consultation("Other", Some("   ")));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "other_project_type");
        assert_eq!(errors[0].msg, "Please specify your project type.");
    }

    #[test]
    fn test_project_type_is_exact_not_fuzzy() {
        // Case differences or stray text are not silently accepted.
        let errors = validation::validate_consultation(&consultation("ultimate pack", None));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].msg, "Unknown project type.");
    }

    #[test]
    fn test_service_with_only_blank_features_fails() {
        let payload = ServiceRequest {
            title: "AI Website".to_string(),
            features: vec!["  ".to_string(), "".to_string()],
            price: "$2500".to_string(),
            monthly_price: "$99/mo".to_string(),
            button_label: "Get Started".to_string(),
            popular: false,
            show_on_main_page: true,
        };
        let errors = validation::validate_service(&payload);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "features");
        assert_eq!(errors[0].msg, "At least one feature is required.");
    }
}
