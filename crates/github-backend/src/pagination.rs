use crate::error::Result;

/// Page size used for every list endpoint (GitHub's maximum)
pub const PAGE_SIZE: usize = 100;

/// Fetch 1-based pages until a short or empty page comes back
pub fn fetch_all_pages<T, F>(mut fetch_page: F, page_size: usize) -> Result<Vec<T>>
where
    F: FnMut(usize) -> Result<Vec<T>>,
{
    let mut all_results = Vec::new();
    let mut page = 1;

    loop {
        let page_results = fetch_page(page)?;
        let page_len = page_results.len();
        all_results.extend(page_results);

        if page_len < page_size {
            break;
        }
        page += 1;
    }

    Ok(all_results)
}
