//! Prompt construction for the scoring oracle.

use lexmatch_core::Advocate;

// ── Prompt template ──

const TASK: &str = "\
Task: Based on the case description and available advocates, decide:
1. Analyze the legal requirements of the case
2. Select the best-suited advocate (name only)
3. Provide a short justification for the selected advocate
4. Rate the match quality from 1-10 (10 being perfect match)

Rules:
- Do NOT mention advocates not in the list.
- Only suggest ONE advocate who is most suitable.
- Consider specialization, experience, and rating.
- If no advocate seems particularly suitable, rate the match as 5 or below.
- Format the response as:

Match Quality: <rating>/10

Selected Advocate:
<Advocate Name> - <Short reason for selection>";

/// Render the advocate pool as numbered text blocks, one per advocate.
pub fn format_advocates(advocates: &[Advocate]) -> String {
    advocates
        .iter()
        .enumerate()
        .map(|(i, a)| {
            format!(
                "Advocate {n}:\n\
                 Name: {name}\n\
                 Age: {age}\n\
                 Description: {description}\n\
                 Skills: {skills}\n\
                 Experience: {experience} years\n\
                 Gender: {gender}\n\
                 Rating: {rating}/10\n\
                 Email: {email}\n",
                n = i + 1,
                name = a.name,
                age = a.age,
                description = a.short_description,
                skills = a.skills,
                experience = a.experience,
                gender = a.gender,
                rating = a.rating,
                email = a.email,
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the single instruction prompt sent to the oracle.
///
/// The case description is embedded verbatim.
pub fn build_prompt(case_description: &str, advocates: &[Advocate]) -> String {
    format!(
        "{TASK}\n\nCase Description:\n{case_description}\n\nAvailable Advocates:\n{}\n",
        format_advocates(advocates)
    )
}
