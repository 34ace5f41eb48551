//! Data Normalizer — coerces loosely-shaped résumé payloads into
//! [`ResumeRecord`].
//!
//! This is the only place that tolerates field-name drift. Payloads have
//! shipped with snake_case and camelCase keys, a capitalised `Profile`
//! block, summaries as bare strings, skills as comma-separated strings, and
//! several historical names per work/education field. Every variant maps to
//! one canonical record; missing scalars become `""` and missing lists `[]`.

use serde_json::{Map, Value};

use crate::models::resume::{
    Contact, Education, Profile, ResumeRecord, Skills, Summary, WorkExperience,
};
use crate::render::format::number_text;

const PROFILE_KEYS: &[&str] = &["profile", "Profile"];
const CONTACT_KEYS: &[&str] = &["contact", "Contact"];
const NAME_KEYS: &[&str] = &["name", "full_name", "fullName"];
const HEADLINE_KEYS: &[&str] = &["headline", "title"];
const LOCATION_KEYS: &[&str] = &["location"];
const EMAIL_KEYS: &[&str] = &["email"];
const PHONE_KEYS: &[&str] = &["phone"];
const LINKEDIN_KEYS: &[&str] = &["linkedin", "linkedIn", "linkedin_url", "linkedinUrl"];

const SUMMARY_KEYS: &[&str] = &["summary", "Summary"];
const SKILLS_KEYS: &[&str] = &["skills", "Skills"];

const WORK_KEYS: &[&str] = &["work_experience", "workExperience", "experience"];
const COMPANY_KEYS: &[&str] = &[
    "companyTitle",
    "company_title",
    "company",
    "companyName",
    "company_name",
];
const ROLE_KEYS: &[&str] = &["roleTitle", "role_title", "role", "title", "position"];
const EMPLOYMENT_TYPE_KEYS: &[&str] = &["employmentType", "employment_type"];
const START_KEYS: &[&str] = &["startDate", "start_date", "start"];
const END_KEYS: &[&str] = &["endDate", "end_date", "end"];
const BULLET_KEYS: &[&str] = &["bullets", "bullet_points", "bulletPoints", "highlights"];

const EDUCATION_KEYS: &[&str] = &["education", "Education"];
const DEGREE_KEYS: &[&str] = &["degree"];
const INSTITUTION_KEYS: &[&str] = &["institution", "school", "university"];
const FIELD_KEYS: &[&str] = &["field", "field_of_study", "fieldOfStudy", "major"];
const DATE_KEYS: &[&str] = &["date", "graduation_date", "graduationDate", "end_date", "endDate"];
const COURSEWORK_KEYS: &[&str] = &[
    "coursework",
    "courses",
    "relevant_coursework",
    "relevantCoursework",
];

/// Normalizes any résumé payload. Non-object input yields an empty record.
pub fn normalize_resume(raw: &Value) -> ResumeRecord {
    let Some(root) = raw.as_object() else {
        return ResumeRecord::default();
    };

    ResumeRecord {
        profile: normalize_profile(first_object(root, PROFILE_KEYS)),
        summary: normalize_summary(first(root, SUMMARY_KEYS)),
        skills: normalize_skills(first(root, SKILLS_KEYS)),
        work_experience: objects(first_items(root, WORK_KEYS))
            .map(normalize_work_item)
            .collect(),
        education: objects(first_items(root, EDUCATION_KEYS))
            .map(normalize_education_item)
            .collect(),
    }
}

fn normalize_profile(profile: Option<&Map<String, Value>>) -> Profile {
    let Some(profile) = profile else {
        return Profile::default();
    };
    let contact = first_object(profile, CONTACT_KEYS);
    // contact fields may sit directly on the profile in older payloads
    let contact_field = |keys: &'static [&'static str]| {
        let nested = contact.map(|c| text(c, keys)).unwrap_or_default();
        if nested.is_empty() {
            text(profile, keys)
        } else {
            nested
        }
    };

    Profile {
        name: text(profile, NAME_KEYS),
        headline: text(profile, HEADLINE_KEYS),
        contact: Contact {
            location: contact_field(LOCATION_KEYS),
            email: contact_field(EMAIL_KEYS),
            phone: contact_field(PHONE_KEYS),
            linkedin: contact_field(LINKEDIN_KEYS),
        },
    }
}

fn normalize_summary(summary: Option<&Value>) -> Summary {
    let text = match summary {
        Some(Value::Object(map)) => map.get("text").map(scalar).unwrap_or_default(),
        Some(other) => scalar(other),
        None => String::new(),
    };
    Summary { text }
}

fn normalize_skills(skills: Option<&Value>) -> Skills {
    let raw = match skills {
        Some(Value::Object(map)) => map.get("raw").map(string_list).unwrap_or_default(),
        Some(other) => string_list(other),
        None => Vec::new(),
    };
    Skills { raw }
}

fn normalize_work_item(item: &Map<String, Value>) -> WorkExperience {
    WorkExperience {
        company_title: text(item, COMPANY_KEYS),
        role_title: text(item, ROLE_KEYS),
        employment_type: text(item, EMPLOYMENT_TYPE_KEYS),
        location: text(item, LOCATION_KEYS),
        start_date: text(item, START_KEYS),
        end_date: text(item, END_KEYS),
        bullets: list(item, BULLET_KEYS, '\n'),
    }
}

fn normalize_education_item(item: &Map<String, Value>) -> Education {
    Education {
        institution: text(item, INSTITUTION_KEYS),
        degree: text(item, DEGREE_KEYS),
        field: text(item, FIELD_KEYS),
        date: text(item, DATE_KEYS),
        coursework: list(item, COURSEWORK_KEYS, ','),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Loose field access
// ────────────────────────────────────────────────────────────────────────────

/// First present, non-null value among `keys`.
fn first<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| map.get(*key))
        .find(|value| !value.is_null())
}

/// First value among `keys` that is a non-empty array. An empty list under
/// one spelling does not hide a populated list under another.
fn first_items<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| map.get(*key))
        .find(|value| value.as_array().is_some_and(|items| !items.is_empty()))
}

fn first_object<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Map<String, Value>> {
    keys.iter().find_map(|key| map.get(*key).and_then(Value::as_object))
}

/// First non-empty scalar among `keys`, trimmed.
fn text(map: &Map<String, Value>, keys: &[&str]) -> String {
    keys.iter()
        .filter_map(|key| map.get(*key))
        .map(scalar)
        .find(|s| !s.is_empty())
        .unwrap_or_default()
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => number_text(n),
        _ => String::new(),
    }
}

fn objects<'a>(value: Option<&'a Value>) -> impl Iterator<Item = &'a Map<String, Value>> {
    value
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
}

/// First non-empty list among `keys`.
fn list(map: &Map<String, Value>, keys: &[&str], separator: char) -> Vec<String> {
    keys.iter()
        .filter_map(|key| map.get(*key))
        .map(|value| split_list(value, separator))
        .find(|entries| !entries.is_empty())
        .unwrap_or_default()
}

/// Arrays keep their scalar entries; strings split on commas.
fn string_list(value: &Value) -> Vec<String> {
    split_list(value, ',')
}

fn split_list(value: &Value, separator: char) -> Vec<String> {
    let entries: Vec<String> = match value {
        Value::Array(items) => items.iter().map(scalar).collect(),
        Value::String(s) => s.split(separator).map(|part| part.trim().to_string()).collect(),
        _ => Vec::new(),
    };
    entries.into_iter().filter(|s| !s.is_empty()).collect()
}
