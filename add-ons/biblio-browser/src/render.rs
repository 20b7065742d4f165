//! Plain-text views of entities and result sets.

use biblio_core::{CatalogStats, Entity, EntityCategory, ResultEnvelope, Translations};
use std::fmt::Write;

pub fn result_list(envelope: &ResultEnvelope, labels: &Translations) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} result(s)", envelope.count);
    for (i, e) in envelope.items.iter().enumerate() {
        let _ = writeln!(out, "{}", summary_line(i + 1, e, labels));
    }
    out
}

pub fn entity_list(title: &str, entities: &[Entity], labels: &Translations) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", title, entities.len());
    for (i, e) in entities.iter().enumerate() {
        let _ = writeln!(out, "{}", summary_line(i + 1, e, labels));
    }
    out
}

/// Short tag shown next to an entity's name.
pub fn badge(category: EntityCategory) -> &'static str {
    match category {
        EntityCategory::Book => "book",
        EntityCategory::Student => "student",
        EntityCategory::Teacher => "teacher",
        EntityCategory::Author => "author",
        EntityCategory::Publisher => "publisher",
        EntityCategory::Journal => "journal",
        EntityCategory::Librarian => "librarian",
        EntityCategory::Person => "person",
        EntityCategory::Place => "place",
        EntityCategory::Organisation => "org",
        EntityCategory::Other => "item",
    }
}

fn summary_line(position: usize, e: &Entity, labels: &Translations) -> String {
    let mut line = format!(
        "{:>3}. ({}) {} [{}] <{}>",
        position,
        badge(e.category()),
        e.display_name(),
        labels.label(e.kind()),
        e.origin().label()
    );
    if let Some(d) = e.description() {
        line.push_str(" - ");
        line.push_str(d);
    }
    line
}

/// Detail view. Relation values show their label with a `->` marker when followable.
pub fn detail(e: &Entity, labels: &Translations) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {} == ({})", e.display_name(), badge(e.category()));
    let _ = writeln!(out, "{}: {}  ({})", labels.label("clase"), labels.label(e.kind()), e.origin().label());
    let _ = writeln!(out, "id: {}", e.id());
    if let Some(img) = e.image() {
        let _ = writeln!(out, "image: {}", img);
    }

    for (name, values) in e.detail_attributes() {
        let _ = writeln!(out, "{}: {}", labels.label(&name), values.join(", "));
    }

    let links = e.relation_links();
    if !links.is_empty() {
        let _ = writeln!(out, "-- relations --");
    }
    for (name, refs) in links {
        let _ = writeln!(out, "{}:", labels.label(name));
        for (i, r) in refs.iter().enumerate() {
            if r.is_navigable() {
                let _ = writeln!(out, "  {}. {} ->", i + 1, r.label);
            } else {
                let _ = writeln!(out, "  {}. {}", i + 1, r.label);
            }
        }
    }
    out
}

pub fn stats(stats: &CatalogStats, labels: &Translations) -> String {
    let mut out = String::new();
    for (listing, n) in &stats.counts {
        let _ = writeln!(out, "{:<16}{:>6}", labels.label(listing.title()), n);
    }
    let _ = writeln!(out, "{:<16}{:>6}", "total", stats.total());
    out
}
