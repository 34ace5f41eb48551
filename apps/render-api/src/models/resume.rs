use serde::Serialize;
use serde_json::{Map, Value};

use crate::render::format::{education_html, safe_html, work_experience_html};

/// Canonical résumé shape consumed by the template interpreter.
///
/// Built fresh by `render::normalize::normalize_resume` for every render and
/// discarded afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResumeRecord {
    pub profile: Profile,
    pub summary: Summary,
    pub skills: Skills,
    pub work_experience: Vec<WorkExperience>,
    pub education: Vec<Education>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Profile {
    pub name: String,
    pub headline: String,
    pub contact: Contact,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Contact {
    pub location: String,
    pub email: String,
    pub phone: String,
    pub linkedin: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Skills {
    pub raw: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkExperience {
    pub company_title: String,
    pub role_title: String,
    pub employment_type: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Education {
    pub institution: String,
    pub degree: String,
    pub field: String,
    pub date: String,
    pub coursework: Vec<String>,
}

impl ResumeRecord {
    /// Builds the render context: the canonical fields, `Profile` and
    /// `workExperience` aliases, and SafeHtml fragments `work_experience_html`
    /// and `education_html`.
    pub fn to_context(&self) -> Value {
        let profile = Value::from(&self.profile);
        let work: Vec<Value> = self.work_experience.iter().map(Value::from).collect();
        let education: Vec<Value> = self.education.iter().map(Value::from).collect();

        let mut ctx = Map::new();
        ctx.insert("Profile".into(), profile.clone());
        ctx.insert("profile".into(), profile);
        ctx.insert("summary".into(), object([("text", self.summary.text.as_str().into())]));
        ctx.insert("skills".into(), object([("raw", self.skills.raw.clone().into())]));
        ctx.insert("work_experience_html".into(), safe_html(work_experience_html(&work)));
        ctx.insert("education_html".into(), safe_html(education_html(&education)));
        ctx.insert("workExperience".into(), Value::Array(work.clone()));
        ctx.insert("work_experience".into(), Value::Array(work));
        ctx.insert("education".into(), Value::Array(education));
        Value::Object(ctx)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Context conversions
// ────────────────────────────────────────────────────────────────────────────

fn object<const N: usize>(fields: [(&str, Value); N]) -> Value {
    Value::Object(
        fields
            .into_iter()
            .map(|(key, value)| (key.to_string(), value))
            .collect(),
    )
}

impl From<&Profile> for Value {
    fn from(profile: &Profile) -> Self {
        let contact = &profile.contact;
        object([
            ("name", profile.name.as_str().into()),
            ("headline", profile.headline.as_str().into()),
            (
                "contact",
                object([
                    ("location", contact.location.as_str().into()),
                    ("email", contact.email.as_str().into()),
                    ("phone", contact.phone.as_str().into()),
                    ("linkedin", contact.linkedin.as_str().into()),
                ]),
            ),
        ])
    }
}

impl From<&WorkExperience> for Value {
    fn from(item: &WorkExperience) -> Self {
        object([
            ("companyTitle", item.company_title.as_str().into()),
            ("roleTitle", item.role_title.as_str().into()),
            ("employmentType", item.employment_type.as_str().into()),
            ("location", item.location.as_str().into()),
            ("startDate", item.start_date.as_str().into()),
            ("endDate", item.end_date.as_str().into()),
            ("bullets", item.bullets.clone().into()),
        ])
    }
}

impl From<&Education> for Value {
    fn from(item: &Education) -> Self {
        object([
            ("institution", item.institution.as_str().into()),
            ("degree", item.degree.as_str().into()),
            ("field", item.field.as_str().into()),
            ("date", item.date.as_str().into()),
            ("coursework", item.coursework.clone().into()),
        ])
    }
}
