use serde::Serialize;
use taskboard_core::{FieldErrors, TaskboardError};

#[derive(Serialize)]
pub struct CliResponse<T: Serialize> {
    pub success: bool,
    pub api_version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Per-field messages when a form failed validation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<FieldErrors>,
}

#[derive(Serialize)]
pub struct ListResponse<T: Serialize> {
    pub items: Vec<T>,
    pub count: usize,
}

pub fn output_success<T: Serialize>(data: T) {
    let response = CliResponse {
        success: true,
        api_version: env!("CARGO_PKG_VERSION"),
        data: Some(data),
        error: None,
        fields: None,
    };
    match serde_json::to_string(&response) {
        Ok(json) => println!("{json}"),
        Err(e) => output_error(&format!("Could not encode response: {e}")),
    }
}

pub fn output_list<T: Serialize>(items: Vec<T>) {
    let count = items.len();
    let list = ListResponse { items, count };
    output_success(list);
}

/// Prints an error response to stderr and exits with status 1.
pub fn output_error(message: &str) -> ! {
    print_error(message, None)
}

/// Like [`output_error`], using the message a user would see for `err`.
pub fn output_failure(err: &anyhow::Error) -> ! {
    match err.downcast_ref::<TaskboardError>() {
        Some(err) => print_error(&err.user_message(), err.field_errors().cloned()),
        None => print_error(&format!("{err:#}"), None),
    }
}

fn print_error(message: &str, fields: Option<FieldErrors>) -> ! {
    let response: CliResponse<()> = CliResponse {
        success: false,
        api_version: env!("CARGO_PKG_VERSION"),
        data: None,
        error: Some(message.to_string()),
        fields,
    };
    match serde_json::to_string(&response) {
        Ok(json) => eprintln!("{json}"),
        Err(_) => eprintln!("{message}"),
    }
    std::process::exit(1);
}
