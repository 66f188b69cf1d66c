//! Evaluates a page: one query per distinct template, then one view per region.

use std::{
    collections::{BTreeMap, btree_map::Entry},
    sync::Arc,
    time::Instant,
};

use api_types::{PageResponse, RegionResponse};
use catalog::{QueryError, QueryParams, QueryRequest, TemplateId};
use tracing::{info, warn};
use warehouse::TabularResult;

use crate::{
    pages::{PageId, Region},
    state::ApiState,
};

type TemplateResult = Result<Arc<TabularResult>, QueryError>;

async fn run_template(state: &ApiState, request: QueryRequest) -> TemplateResult {
    state
        .cache()
        .get_or_compute(&request, state.cache_ttl(), || state.catalog().run(state.reader(), &request))
        .await
}

fn render_region(region: Region, result: &TemplateResult) -> RegionResponse {
    let table = match result {
        Ok(table) => table,
        Err(e) => return RegionResponse::error(region.id, region.template, e.to_string()),
    };
    match presentation::render(table, &region.view) {
        Ok(view) => RegionResponse::ok(region.id, region.template, view),
        Err(e) => {
            warn!(region = region.id, template = %region.template, error = %e, "Region could not be rendered");
            RegionResponse::error(region.id, region.template, e.to_string())
        }
    }
}

/// Evaluate `page` for already validated `params`.
///
/// Templates run one after another in layout order, each at most once, and
/// go through the result cache. A failing template only marks the regions
/// it feeds as failed.
pub async fn load_page(state: &ApiState, page: PageId, params: QueryParams) -> PageResponse {
    let start = Instant::now();
    let layout = page.regions();
    let mut results: BTreeMap<TemplateId, TemplateResult> = BTreeMap::new();
    let mut regions = Vec::with_capacity(layout.len());

    for region in layout {
        let result = match results.entry(region.template) {
            Entry::Occupied(slot) => slot.into_mut(),
            Entry::Vacant(slot) => {
                let request = QueryRequest::new(region.template, params);
                let result = run_template(state, request).await;
                if let Err(e) = &result {
                    warn!(page = %page, template = %region.template, error = %e, "Query template failed");
                }
                slot.insert(result)
            }
        };
        regions.push(render_region(region, result));
    }

    let failed = results.values().filter(|r| r.is_err()).count();
    info!(
        page = %page,
        templates = results.len(),
        failed,
        duration_ms = start.elapsed().as_millis(),
        "Page evaluated"
    );

    PageResponse {
        page: page.slug().to_owned(),
        title: page.title().to_owned(),
        params,
        regions,
    }
}
