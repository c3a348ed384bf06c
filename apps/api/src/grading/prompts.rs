// Grading prompt and the structured-output schema the model must fill.

use serde_json::{json, Value};

pub const GRADING_PROMPT_TEMPLATE: &str = "\
You're an AI recruiter. Analyze the following resume and extract the content and give me
- their full name
- a list of their qualifications
- a rating from 1.000-100.00 based on how they fit the job requirements
- a very short description of them 1-3 sentences.
- extract their email address
- extract their phone number

Job description:
{job_description}

";

/// Builds the combined input blob: instructions with the job description,
/// immediately followed by the resume text.
pub fn build_grading_input(resume_text: &str, job_description: &str) -> String {
    let mut input = GRADING_PROMPT_TEMPLATE.replace("{job_description}", job_description);
    input.push_str(resume_text);
    input
}

/// Response schema declaring exactly the six evaluation fields.
pub fn response_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "Name": { "type": "string" },
            "Grade": { "type": "number" },
            "Skills": {
                "type": "array",
                "items": { "type": "string" }
            },
            "Description": { "type": "string" },
            "Email": { "type": "string" },
            "Phone": { "type": "string" }
        }
    })
}
