//! Headless selection: search, take the N-th result, embed it.

use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;

use crate::catalog::{CatalogApi, CatalogError, ItunesClient};
use crate::config::Config;
use crate::cover::ArtworkFetcher;
use crate::error::{Error, Result};
use crate::grid::display_title;
use crate::session::{Pipeline, Session, TargetFileSet};
use crate::tags::{LoftyTags, TagContainer};

/// Pick the `index`-th search result for `query` and embed it into `targets`
pub fn cmd_pick(
    rt: &Runtime,
    config: &Config,
    targets: TargetFileSet,
    query: &str,
    index: usize,
) -> anyhow::Result<()> {
    let catalog = ItunesClient::from_config(&config.provider);
    let pipeline = Pipeline::new(
        Arc::new(ArtworkFetcher::from_config(&config.provider)),
        LoftyTags,
        config.display.thumbnail_size,
        config.provider.download_size,
    );

    let status = rt.block_on(pick_and_embed(
        &catalog,
        &pipeline,
        config.display.thumbnail_size,
        targets,
        query,
        index,
    ))?;
    println!("{}", status);
    Ok(())
}

/// Drive a session without a window. Returns the final status line.
pub(crate) async fn pick_and_embed<T>(
    catalog: &dyn CatalogApi,
    pipeline: &Pipeline<T>,
    thumbnail_size: u32,
    targets: TargetFileSet,
    query: &str,
    index: usize,
) -> Result<String>
where
    T: TagContainer + Clone + 'static,
{
    let mut session = Session::new(targets, query, Duration::ZERO);
    let Some(generation) = session.begin_search(query) else {
        return Err(Error::Catalog(CatalogError::EmptyQuery));
    };

    let results = catalog
        .search(session.status(), (thumbnail_size, thumbnail_size))
        .await;
    session.finish_search(generation, results);

    if session.candidates().is_empty() {
        return Ok("No results.".to_string());
    }
    for (i, candidate) in session.candidates().iter().enumerate() {
        println!("{:>3}  {}", i, display_title(&candidate.artist, &candidate.title));
    }
    if index >= session.candidates().len() {
        return Err(Error::selection(format!(
            "result {} does not exist ({} results)",
            index,
            session.candidates().len()
        )));
    }

    let Some(candidate) = session.select(index) else {
        return Ok(session.status().to_string());
    };
    let result = pipeline.apply_selection(&candidate, session.targets()).await;
    session.finish_embedding(result);
    Ok(session.status().to_string())
}
