//! Terminal rendering for advocates and match results.

use lexmatch_core::{Advocate, MatchResult};

const MAX_NAME_WIDTH: usize = 28;

// ── Public API ──

/// Print a match result as a vertical card: the decision, then the profile.
pub fn print_match_card(result: &MatchResult) {
    println!("=== {} ===", result.advocate.name);
    println!("{}", result.message);
    println!();

    println!("Match");
    field("match_type", result.match_type.as_str());
    field("match_accuracy", result.match_accuracy);
    field("reason", &result.reason);
    println!();

    print_profile(&result.advocate);
}

/// Print the pool as one row per advocate.
pub fn print_advocate_table(advocates: &[Advocate]) {
    if advocates.is_empty() {
        println!("No advocates found.");
        return;
    }

    println!(
        "{:>5}  {:<w$}  {:>6}  {:>4}  {}",
        "sl_no",
        "name",
        "rating",
        "exp",
        "skills",
        w = MAX_NAME_WIDTH
    );
    for a in advocates {
        println!(
            "{:>5}  {:<w$}  {:>6}  {:>4}  {}",
            a.sl_no,
            truncate(&a.name, MAX_NAME_WIDTH),
            a.rating,
            a.experience,
            a.skill_tags().join(", "),
            w = MAX_NAME_WIDTH
        );
    }
    println!();
    println!("{} advocate(s)", advocates.len());
}

// ── Sections ──

fn print_profile(advocate: &Advocate) {
    println!("Profile");
    field("sl_no", advocate.sl_no);
    field("age", advocate.age);
    field("gender", &advocate.gender);
    field("experience", format!("{} years", advocate.experience));
    field("rating", format!("{}/10", advocate.rating));
    field("email", &advocate.email);
    println!();

    if !advocate.short_description.is_empty() {
        println!("Description");
        println!("  {}", advocate.short_description);
        println!();
    }

    let tags = advocate.skill_tags();
    if !tags.is_empty() {
        println!("Skills");
        for tag in tags {
            println!("  - {tag}");
        }
        println!();
    }
}

fn field(label: &str, value: impl std::fmt::Display) {
    println!("  {:<26} {}", label, value);
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let cut: String = s.chars().take(max.saturating_sub(3)).collect();
    format!("{cut}...")
}
