use anyhow::Result;

use crate::config;
use crate::store::FileProjectStore;
use crate::widget::view::render_panel;

pub async fn run(project_ref: Option<String>) -> Result<()> {
    let root = config::project_root()?;
    let cfg = config::read(&root)?;

    let widget = super::open_widget(&root, &cfg, project_ref).await?;
    print!("{}", render_panel(&widget.view()));

    match &widget.model().project_ref {
        Some(project_ref) => println!("  Project: {}", project_ref),
        None => println!("  No project selected. Pass --project-ref or set project_ref in config.toml."),
    }

    let snapshot = FileProjectStore::new(config::project_path(&root));
    if let Some(project) = snapshot.load()? {
        println!(
            "  Last refreshed: {} ({}) {}",
            project.name,
            project.project_ref,
            project.status.as_deref().unwrap_or("status unknown")
        );
    }

    Ok(())
}
