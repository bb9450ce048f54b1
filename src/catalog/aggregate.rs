//! Merging design-asset results from several providers.

use std::collections::HashMap;

use crate::catalog::types::Asset;

/// Result of merging provider responses into a single page.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedAssets {
    pub assets: Vec<Asset>,
    pub total: usize,
    pub total_pages: usize,
}

/// Deduplicate by id, rank by downloads and cut out the requested page.
///
/// A repeated id keeps the position of its first occurrence and the value of
/// its last one. Ties in `downloads` keep provider order.
pub fn merge_assets(results: Vec<Asset>, page: u32, per_page: u32) -> MergedAssets {
    let mut index: HashMap<String, usize> = HashMap::with_capacity(results.len());
    let mut unique: Vec<Asset> = Vec::with_capacity(results.len());

    for asset in results {
        match index.get(&asset.id) {
            Some(&slot) => unique[slot] = asset,
            None => {
                index.insert(asset.id.clone(), unique.len());
                unique.push(asset);
            }
        }
    }

    unique.sort_by(|a, b| b.downloads.cmp(&a.downloads));

    let total = unique.len();
    let per_page = per_page.max(1) as usize;
    let total_pages = total.div_ceil(per_page);
    let skip = (page.max(1) as usize - 1).saturating_mul(per_page);
    let assets = unique.into_iter().skip(skip).take(per_page).collect();

    MergedAssets {
        assets,
        total,
        total_pages,
    }
}
