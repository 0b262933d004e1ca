//! Fixed conversational text.

/// System instructions handed to the driving model with the action list.
pub const INSTRUCTIONS: &str = "\
You are a helpful assistant for a school and interview preparation service. \
Your goal is to help answer users' questions about their profiles, school details, and interview tips. \
Start by collecting or looking up their profile information. Once you have their profile, \
you can answer questions or provide guidance based on their school and interview status.";

pub const WELCOME_MESSAGE: &str = "Welcome to the School and Interview Assistant! Please provide your name or say \"create profile\" to set up your user profile.";

pub const CREATION_INSTRUCTIONS: &str =
    "Please provide your name, school, and interview status separated by commas.";

pub const RETRY_LATER: &str =
    "Sorry, I can't reach your profile records right now. Please try again in a moment.";

pub const GENERIC_APOLOGY: &str = "Sorry, something went wrong handling that. Please try again.";

pub const PROFILE_EXISTS: &str = "A profile with that name already exists. \
Please provide different details: name, school, and interview status separated by commas.";

/// Reply shown while a profile is active.
pub fn profile_details(summary: &str) -> String {
    format!("Your profile details:\n{summary}")
}

/// Corrective reply for a creation attempt with an empty field.
pub fn missing_field(field: &str) -> String {
    let label = field.replace('_', " ");
    format!("The {label} can't be empty. {CREATION_INSTRUCTIONS}")
}
