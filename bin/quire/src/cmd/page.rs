//! Page commands - create, edit, delete, list and show pages

use chrono::{Local, NaiveDate};
use color_eyre::eyre::{Result, WrapErr, eyre};
use quire_core::{
    NewPage, Page, PageSelector, PageUpdate,
    mutate::{create_page, delete_page, update_page},
};

use crate::Project;

/// Create a page, dated today unless the input carries a date.
pub fn new(project: &Project, page: NewPage) -> Result<Page> {
    new_on(project, page, Local::now().date_naive())
}

fn new_on(project: &Project, page: NewPage, today: NaiveDate) -> Result<Page> {
    tracing::info!(title = %page.title, "Creating page");

    let created = project
        .store()
        .update(|doc| create_page(doc, page, today).cloned())
        .wrap_err("Failed to create page")?;

    println!("Created: {} ({})", created.title, created.slug);
    Ok(created)
}

/// Overwrite fields of an existing page.
pub fn edit(project: &Project, selector: &PageSelector, update: PageUpdate) -> Result<Page> {
    tracing::info!(%selector, "Updating page");

    let updated = project
        .store()
        .update(|doc| update_page(doc, selector, update).cloned())
        .wrap_err_with(|| format!("Failed to update page {selector}"))?;

    println!("Updated: {} ({})", updated.title, updated.slug);
    Ok(updated)
}

/// Remove a page.
pub fn delete(project: &Project, selector: &PageSelector) -> Result<Page> {
    tracing::info!(%selector, "Deleting page");

    let removed = project
        .store()
        .update(|doc| delete_page(doc, selector))
        .wrap_err_with(|| format!("Failed to delete page {selector}"))?;

    println!("Deleted: {} ({})", removed.title, removed.slug);
    Ok(removed)
}

/// Print every page in document order.
pub fn list(project: &Project) -> Result<Vec<Page>> {
    let doc = project
        .store()
        .load()
        .wrap_err("Failed to load site document")?;

    if doc.pages.is_empty() {
        println!("No pages yet.");
        return Ok(doc.pages);
    }

    for (index, page) in doc.pages.iter().enumerate() {
        let mut flags = Vec::new();
        if page.is_draft() {
            flags.push("draft");
        }
        if page.is_featured() {
            flags.push("featured");
        }
        let flags = if flags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", flags.join(", "))
        };

        println!(
            "{index:>3}  {:<24} {:<10} {}{flags}",
            page.slug,
            page.published_date().unwrap_or("-"),
            page.title,
        );
    }

    Ok(doc.pages)
}

/// Print one page's metadata and content.
pub fn show(project: &Project, slug: &str) -> Result<Page> {
    let page = project
        .store()
        .page_by_slug(slug)
        .wrap_err("Failed to load site document")?
        .ok_or_else(|| eyre!("No page with slug `{slug}`"))?;

    println!("Title:     {}", page.title);
    println!("Slug:      {}", page.slug);
    if let Some(date) = page.published_date() {
        println!("Published: {date}");
    }
    if let Some(minutes) = page.reading_minutes() {
        println!("Reading:   {minutes} min");
    }
    if let Some(category) = &page.category {
        println!("Category:  {category}");
    }
    if !page.tag_list().is_empty() {
        println!("Tags:      {}", page.tag_list().join(", "));
    }
    if page.is_draft() {
        println!("Draft:     yes");
    }
    println!();
    println!("{}", page.content);

    Ok(page)
}
