// 📐 Payload Validation
// Checks incoming JSON bodies field by field and collects every problem,
// so a client sees all offending fields in one 422 response.

use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::models::{ConsultationCreate, EnrollmentCreate, PaymentMethod, PaymentPlan, ProgramType};

// ============================================================================
// FIELD ERROR
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Location of the problem, e.g. `["body", "email"]`
    pub loc: Vec<String>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl FieldError {
    fn new(field: Option<&str>, msg: impl Into<String>, kind: &str) -> Self {
        let mut loc = vec!["body".to_string()];
        if let Some(field) = field {
            loc.push(field.to_string());
        }
        FieldError {
            loc,
            msg: msg.into(),
            kind: kind.to_string(),
        }
    }

    pub fn missing(field: &str) -> Self {
        Self::new(Some(field), "field required", "value_error.missing")
    }

    pub fn not_a_string(field: &str) -> Self {
        Self::new(Some(field), "str type expected", "type_error.str")
    }

    pub fn invalid_email(field: &str) -> Self {
        Self::new(
            Some(field),
            "value is not a valid email address",
            "value_error.email",
        )
    }

    pub fn not_in_enum(field: &str, permitted: &[&str]) -> Self {
        let permitted = permitted
            .iter()
            .map(|p| format!("'{}'", p))
            .collect::<Vec<_>>()
            .join(", ");
        Self::new(
            Some(field),
            format!("value is not a valid enumeration member; permitted: {}", permitted),
            "type_error.enum",
        )
    }

    /// Body was not valid JSON, or not a JSON object
    pub fn malformed_body(msg: impl Into<String>) -> Self {
        Self::new(None, msg, "value_error.jsondecode")
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.loc.join("."), self.msg)
    }
}

pub type ValidationResult<T> = Result<T, Vec<FieldError>>;

// ============================================================================
// EMAIL SYNTAX
// ============================================================================

const MAX_EMAIL_LEN: usize = 254;
const MAX_LOCAL_PART_LEN: usize = 64;

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~.-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*\.[A-Za-z]{2,63}$",
        )
        .expect("email pattern compiles")
    })
}

/// Syntactic check only: `local@domain.tld`, no deliverability lookup
pub fn is_valid_email(email: &str) -> bool {
    if email.len() > MAX_EMAIL_LEN || !email_pattern().is_match(email) {
        return false;
    }

    let Some((local, _domain)) = email.rsplit_once('@') else {
        return false;
    };

    local.len() <= MAX_LOCAL_PART_LEN
        && !local.starts_with('.')
        && !local.ends_with('.')
        && !local.contains("..")
}

// ============================================================================
// FIELD READER
// ============================================================================

/// Reads typed fields out of a JSON object, recording an error for each bad one
struct Fields<'a> {
    object: Option<&'a Map<String, Value>>,
    errors: Vec<FieldError>,
}

impl<'a> Fields<'a> {
    fn new(body: &'a Value) -> Self {
        let mut errors = Vec::new();
        let object = body.as_object();
        if object.is_none() {
            errors.push(FieldError::malformed_body("value is not a valid dict"));
        }
        Fields { object, errors }
    }

    fn raw(&self, name: &str) -> Option<&'a Value> {
        self.object
            .and_then(|o| o.get(name))
            .filter(|v| !v.is_null())
    }

    fn required_str(&mut self, name: &str) -> Option<String> {
        // a non-object body is already reported once
        self.object?;
        match self.raw(name) {
            None => {
                self.errors.push(FieldError::missing(name));
                None
            }
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => {
                self.errors.push(FieldError::not_a_string(name));
                None
            }
        }
    }

    fn optional_str(&mut self, name: &str) -> Option<Option<String>> {
        self.object?;
        match self.raw(name) {
            None => Some(None),
            Some(Value::String(s)) => Some(Some(s.clone())),
            Some(_) => {
                self.errors.push(FieldError::not_a_string(name));
                None
            }
        }
    }

    fn required_email(&mut self, name: &str) -> Option<String> {
        let email = self.required_str(name)?;
        if is_valid_email(&email) {
            Some(email)
        } else {
            self.errors.push(FieldError::invalid_email(name));
            None
        }
    }

    fn required_enum<T: FromStr>(&mut self, name: &str, permitted: &[&str]) -> Option<T> {
        let tag = self.required_str(name)?;
        match tag.parse::<T>() {
            Ok(value) => Some(value),
            Err(_) => {
                self.errors.push(FieldError::not_in_enum(name, permitted));
                None
            }
        }
    }
}

fn tags<const N: usize, T>(all: [T; N], as_str: fn(&T) -> &'static str) -> Vec<&'static str> {
    all.iter().map(as_str).collect()
}

// ============================================================================
// PAYLOAD SCHEMAS
// ============================================================================

/// Validate an enrollment submission.
///
/// `program_type` only has to be a string here; whether it names a program
/// is decided by the catalog lookup afterwards.
pub fn parse_enrollment(body: &Value) -> ValidationResult<EnrollmentCreate> {
    let mut fields = Fields::new(body);

    let student_full_name = fields.required_str("student_full_name");
    let parent_guardian_name = fields.required_str("parent_guardian_name");
    let email = fields.required_email("email");
    let phone = fields.required_str("phone");
    let address = fields.required_str("address");
    let program_type = fields.required_str("program_type");
    let payment_plan = fields.required_enum::<PaymentPlan>(
        "payment_plan",
        &tags(PaymentPlan::ALL, PaymentPlan::as_str),
    );
    let payment_method = fields.required_enum::<PaymentMethod>(
        "payment_method",
        &tags(PaymentMethod::ALL, PaymentMethod::as_str),
    );

    match (
        student_full_name,
        parent_guardian_name,
        email,
        phone,
        address,
        program_type,
        payment_plan,
        payment_method,
    ) {
        (
            Some(student_full_name),
            Some(parent_guardian_name),
            Some(email),
            Some(phone),
            Some(address),
            Some(program_type),
            Some(payment_plan),
            Some(payment_method),
        ) if fields.errors.is_empty() => Ok(EnrollmentCreate {
            student_full_name,
            parent_guardian_name,
            email,
            phone,
            address,
            program_type,
            payment_plan,
            payment_method,
        }),
        _ => Err(fields.errors),
    }
}

/// Validate a consultation request. `child_age_group` must be a known program tag.
pub fn parse_consultation(body: &Value) -> ValidationResult<ConsultationCreate> {
    let mut fields = Fields::new(body);

    let full_name = fields.required_str("full_name");
    let email = fields.required_email("email");
    let phone = fields.optional_str("phone");
    let child_age_group = fields.required_enum::<ProgramType>(
        "child_age_group",
        &tags(ProgramType::ALL, ProgramType::as_str),
    );
    let learning_goals = fields.required_str("learning_goals");

    match (full_name, email, phone, child_age_group, learning_goals) {
        (Some(full_name), Some(email), Some(phone), Some(child_age_group), Some(learning_goals))
            if fields.errors.is_empty() =>
        {
            Ok(ConsultationCreate {
                full_name,
                email,
                phone,
                child_age_group,
                learning_goals,
            })
        }
        _ => Err(fields.errors),
    }
}
