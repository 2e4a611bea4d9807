//! Per-project semantic document: plain HTML plus a JSON-LD `CreativeWork`.

use serde_json::{Map, Value, json};

use crate::content::{DetailRecord, Metric, ProjectEntry};
use crate::dom::Element;

use super::extract::{
    Sample, SampleKind, extract_achievements, extract_metrics, extract_samples, extract_skills,
};

/// ATS-readable output for one project.
#[derive(Debug, Clone, PartialEq)]
pub struct SemanticDocument {
    pub html: String,
    pub json_ld: Value,
    /// Skills, kept for the `Person.knowsAbout` roll-up.
    pub skills: Vec<String>,
}

/// `@id` of the owner node every project points at.
pub const PERSON_ID: &str = "#person";

/// Project a record (optionally merged with its detail) into ATS markup.
///
/// Stateless and deterministic: identical inputs give byte-identical output.
pub fn project_to_semantic_document(
    entry: &ProjectEntry,
    detail: Option<&DetailRecord>,
) -> SemanticDocument {
    let merged = match detail {
        Some(detail) => entry.merged(detail.clone()),
        None => entry.clone(),
    };

    let skills = extract_skills(&merged);
    let metrics = extract_metrics(entry, detail);
    let achievements = extract_achievements(merged.blocks());
    let samples = extract_samples(&merged);

    let html = render_html(&merged, &skills, &metrics, &achievements, &samples);
    let json_ld = creative_work(&merged, &skills, &metrics, &samples);

    SemanticDocument {
        html,
        json_ld,
        skills,
    }
}

fn render_html(
    project: &ProjectEntry,
    skills: &[String],
    metrics: &[Metric],
    achievements: &[String],
    samples: &[Sample],
) -> String {
    let meta: Vec<&str> = [
        project.job_title.as_deref(),
        project.company.as_deref(),
        project.year.as_deref(),
        project.duration.as_deref(),
    ]
    .into_iter()
    .flatten()
    .filter(|s| !s.trim().is_empty())
    .collect();

    let list = |class: &str, heading: &str, items: Vec<Element>| {
        (!items.is_empty()).then(|| {
            Element::with_class("section", class)
                .child(Element::new("h4").text(heading))
                .child(Element::new("ul").children(items))
        })
    };

    let article = Element::with_class("article", "ats-project")
        .attr("data-project-id", project.id.clone())
        .attr("itemscope", "")
        .attr("itemtype", "https://schema.org/CreativeWork")
        .child(
            Element::new("h3")
                .attr("itemprop", "name")
                .text(project.title.clone()),
        )
        .child_opt(
            project
                .display_subtitle()
                .map(|s| Element::with_class("p", "ats-subtitle").text(s)),
        )
        .child_opt(
            (!meta.is_empty()).then(|| Element::with_class("p", "ats-meta").text(meta.join(" | "))),
        )
        .child_opt(project.overview_text().map(|text| {
            Element::new("p")
                .attr("itemprop", "description")
                .text(text)
        }))
        .child_opt(list(
            "ats-skills",
            "Skills",
            skills
                .iter()
                .map(|s| Element::new("li").attr("itemprop", "keywords").text(s.clone()))
                .collect(),
        ))
        .child_opt(list(
            "ats-metrics",
            "Results",
            metrics.iter().map(metric_item).collect(),
        ))
        .child_opt(list(
            "ats-achievements",
            "Achievements",
            achievements
                .iter()
                .map(|a| Element::new("li").text(a.clone()))
                .collect(),
        ))
        .child_opt(list(
            "ats-samples",
            "Work samples",
            samples
                .iter()
                .map(|sample| {
                    let label = sample.label.clone().unwrap_or_else(|| sample.src.clone());
                    Element::new("li").child(
                        Element::new("a")
                            .attr("href", sample.src.clone())
                            .attr("data-kind", kind_str(sample.kind))
                            .text(label),
                    )
                })
                .collect(),
        ));

    article.to_html()
}

fn metric_item(metric: &Metric) -> Element {
    let mut text = format!("{} {}", metric.value, metric.label);
    if let Some(description) = metric.description.as_deref().filter(|d| !d.trim().is_empty()) {
        text.push_str(" - ");
        text.push_str(description);
    }
    Element::new("li").text(text)
}

const fn kind_str(kind: SampleKind) -> &'static str {
    match kind {
        SampleKind::Image => "image",
        SampleKind::Video => "video",
    }
}

fn creative_work(
    project: &ProjectEntry,
    skills: &[String],
    metrics: &[Metric],
    samples: &[Sample],
) -> Value {
    let mut node = Map::new();
    node.insert("@type".into(), json!("CreativeWork"));
    node.insert("@id".into(), json!(format!("#project-{}", project.id)));
    node.insert("name".into(), json!(project.title));

    let mut optional = |key: &str, value: Option<&str>| {
        if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
            node.insert(key.into(), json!(value));
        }
    };
    optional("alternativeHeadline", project.display_subtitle());
    optional("description", project.overview_text());
    optional("dateCreated", project.year.as_deref());
    optional("timeRequired", project.duration.as_deref());

    if let Some(company) = project.company.as_deref().filter(|c| !c.trim().is_empty()) {
        node.insert(
            "sourceOrganization".into(),
            json!({"@type": "Organization", "name": company}),
        );
    }
    node.insert("creator".into(), json!({"@id": PERSON_ID}));
    if let Some(role) = project.job_title.as_deref().filter(|r| !r.trim().is_empty()) {
        node.insert(
            "contributor".into(),
            json!({"@type": "Role", "roleName": role, "contributor": {"@id": PERSON_ID}}),
        );
    }
    if !skills.is_empty() {
        node.insert("keywords".into(), json!(skills.join(", ")));
    }
    if !metrics.is_empty() {
        let properties: Vec<_> = metrics
            .iter()
            .map(|m| json!({"@type": "PropertyValue", "name": m.label, "value": m.value}))
            .collect();
        node.insert("additionalProperty".into(), Value::Array(properties));
    }

    let of_kind = |kind: SampleKind| -> Vec<&str> {
        samples
            .iter()
            .filter(|s| s.kind == kind)
            .map(|s| s.src.as_str())
            .collect()
    };
    let images = of_kind(SampleKind::Image);
    if !images.is_empty() {
        node.insert("image".into(), json!(images));
    }
    let videos: Vec<_> = of_kind(SampleKind::Video)
        .into_iter()
        .map(|src| json!({"@type": "VideoObject", "contentUrl": src}))
        .collect();
    if !videos.is_empty() {
        node.insert("video".into(), Value::Array(videos));
    }

    Value::Object(node)
}
