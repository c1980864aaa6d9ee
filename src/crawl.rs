use crate::error::{Result, ScoutError};
use crate::models::{HotelFragment, RunSummary};
use crate::recorder::Recorder;
use crate::scrapers::{Extractor, Navigator};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Drives a full crawl: every state, every hotel, one output row per hotel
pub struct Crawler {
    navigator: Navigator,
    extractor: Extractor,
    recorder: Arc<Recorder>,
    permits: Arc<Semaphore>,
}

impl Crawler {
    pub fn new(
        navigator: Navigator,
        extractor: Extractor,
        recorder: Recorder,
        max_concurrent_extractions: usize,
    ) -> Self {
        Self {
            navigator,
            extractor,
            recorder: Arc::new(recorder),
            permits: Arc::new(Semaphore::new(max_concurrent_extractions.max(1))),
        }
    }

    /// Run the crawl to completion
    ///
    /// Navigation failures abort the run. Hotels that fail to parse or to be
    /// written are counted in the returned summary and the crawl carries on.
    pub async fn run(&self) -> Result<RunSummary> {
        let mut summary = RunSummary::start();

        println!("[Opening Web Page]");
        let root = self.navigator.fetch_root_listing_page().await?;
        let links = self.navigator.list_state_links(&root)?;
        summary.states_total = links.len();

        println!("[WORKING]");
        for (idx, link) in links.iter().enumerate() {
            println!("STATE: {:<2}/{:<2}", idx + 1, links.len());

            let html = self.navigator.fetch_state_page(link).await?;
            let fragments = self.navigator.list_hotel_fragments(&html);
            info!("{}: {} hotels", link.href, fragments.len());

            summary.hotels_seen += fragments.len();
            self.process_state(&link.href, fragments, &mut summary).await;
            summary.states_visited += 1;
        }

        summary.finish();
        info!(
            "Crawl finished: {} recorded, {} failed",
            summary.recorded,
            summary.failures()
        );
        Ok(summary)
    }

    /// Extract and record every hotel of one state, waiting for all of them
    async fn process_state(
        &self,
        state: &str,
        fragments: Vec<HotelFragment>,
        summary: &mut RunSummary,
    ) {
        let mut tasks = JoinSet::new();

        for (idx, fragment) in fragments.into_iter().enumerate() {
            let extractor = self.extractor.clone();
            let recorder = Arc::clone(&self.recorder);
            let permits = Arc::clone(&self.permits);

            tasks.spawn(async move {
                let outcome = record_hotel(&extractor, &recorder, &permits, &fragment).await;
                (idx, outcome)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((idx, Ok(name))) => {
                    debug!("{} #{}: recorded {}", state, idx, name);
                    summary.recorded += 1;
                }
                Ok((idx, Err(e @ ScoutError::PoolClosed))) => {
                    warn!("{} #{}: hotel not run: {}", state, idx, e);
                    summary.task_failures += 1;
                }
                Ok((idx, Err(e @ ScoutError::Parse(_)))) => {
                    warn!("{} #{}: skipped hotel: {}", state, idx, e);
                    summary.parse_failures += 1;
                }
                Ok((idx, Err(e))) => {
                    warn!("{} #{}: hotel not written: {}", state, idx, e);
                    summary.write_failures += 1;
                }
                Err(e) => {
                    warn!("{}: hotel task crashed: {}", state, e);
                    summary.task_failures += 1;
                }
            }
        }
    }
}

async fn record_hotel(
    extractor: &Extractor,
    recorder: &Recorder,
    permits: &Semaphore,
    fragment: &HotelFragment,
) -> Result<String> {
    let Ok(_permit) = permits.acquire().await else {
        return Err(ScoutError::PoolClosed);
    };

    let record = extractor.extract(fragment)?;
    recorder.append(&record).await?;
    Ok(record.name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::QuoteStyle;
    use crate::scrapers::navigator::tests::{navigator, FakeRenderer};
    use crate::scrapers::{SiteLayout, Selectors};
    use std::time::Duration;
    use tempfile::TempDir;

    const LOCATIONS: &str = r#"<html><body>
        <section class="ws-locations-list-section">
            <div class="subdiv-name"><a href="/locations/ohio">Ohio</a></div>
            <div class="subdiv-name"><a href="/locations/utah">Utah</a></div>
        </section>
    </body></html>"#;

    fn hotel(name: &str, rate: &str) -> String {
        format!(
            r#"<div class="list-view ng-scope">
                <div class="hotel-details">
                    <div class="hotel-name">&nbsp;{name}</div>
                    <div class="hotel-address ng-binding">1 {name} Way</div>
                    <div class="ta-rating"><img alt="4.0 of 5 bubbles"></div>
                </div>
                <div class="currency ng-binding">$</div>
                <div class="price-whole ng-binding">59</div>
                <div class="price-fraction ng-binding">99</div>
                {rate}
            </div>"#
        )
    }

    fn state_page(hotels: &[String]) -> String {
        format!("<html><body>{}</body></html>", hotels.concat())
    }

    fn crawler(renderer: FakeRenderer, dir: &TempDir, workers: usize) -> Crawler {
        let selectors = Arc::new(Selectors::compile(&SiteLayout::default()).unwrap());
        Crawler::new(
            navigator(renderer),
            Extractor::new(selectors),
            Recorder::new(dir.path().join("data.csv"), QuoteStyle::Raw),
            workers,
        )
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_crawl_records_every_state() {
        let nightly = r#"<div class="nightly-rate">per night</div>"#;
        let weekly = r#"<div class="weekly-rate">per week</div>"#;
        let ohio = state_page(&[hotel("Akron", nightly), hotel("Dayton", weekly)]);
        let utah = state_page(&[hotel("Ogden", nightly)]);

        let renderer = FakeRenderer::new(&[
            ("https://hotels.test/locations", LOCATIONS),
            ("https://hotels.test/locations/ohio", ohio.as_str()),
            ("https://hotels.test/locations/utah", utah.as_str()),
        ]);
        let dir = TempDir::new().unwrap();

        let summary = crawler(renderer, &dir, 2).run().await.unwrap();

        assert_eq!(summary.states_visited, 2);
        assert_eq!(summary.hotels_seen, 3);
        assert_eq!(summary.recorded, 3);
        assert_eq!(summary.failures(), 0);

        let content = std::fs::read_to_string(dir.path().join("data.csv")).unwrap();
        let mut rows: Vec<_> = content.lines().skip(1).collect();
        rows.sort();
        assert_eq!(content.lines().next(), Some("name,location,price,frequency,rating"));
        assert_eq!(
            rows,
            vec![
                r#""Akron","1 Akron Way","$59.99","per night","4.0 of 5 bubbles""#,
                r#""Dayton","1 Dayton Way","$59.99","per week","4.0 of 5 bubbles""#,
                r#""Ogden","1 Ogden Way","$59.99","per night","4.0 of 5 bubbles""#,
            ]
        );
    }

    #[tokio::test]
    async fn test_broken_hotel_is_counted_not_fatal() {
        let nightly = r#"<div class="nightly-rate">per night</div>"#;
        let ohio = state_page(&[hotel("Akron", nightly), hotel("Kent", "")]);
        let utah = state_page(&[]);

        let renderer = FakeRenderer::new(&[
            ("https://hotels.test/locations", LOCATIONS),
            ("https://hotels.test/locations/ohio", ohio.as_str()),
            ("https://hotels.test/locations/utah", utah.as_str()),
        ]);
        let dir = TempDir::new().unwrap();

        let summary = crawler(renderer, &dir, 1).run().await.unwrap();

        assert_eq!(summary.states_visited, 2);
        assert_eq!(summary.recorded, 1);
        assert_eq!(summary.parse_failures, 1);
        assert_eq!(summary.write_failures, 0);

        let content = std::fs::read_to_string(dir.path().join("data.csv")).unwrap();
        assert_eq!(content.lines().count(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_worker_cap_holds_back_hotels() {
        let nightly = r#"<div class="nightly-rate">per night</div>"#;
        let ohio = state_page(&[hotel("Akron", nightly), hotel("Dayton", nightly)]);
        let utah = state_page(&[hotel("Ogden", nightly)]);

        let renderer = FakeRenderer::new(&[
            ("https://hotels.test/locations", LOCATIONS),
            ("https://hotels.test/locations/ohio", ohio.as_str()),
            ("https://hotels.test/locations/utah", utah.as_str()),
        ]);
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("data.csv");
        let crawler = Arc::new(crawler(renderer, &dir, 2));

        // Occupy every worker slot so no hotel task can start
        let held = Arc::clone(&crawler.permits).acquire_many_owned(2).await.unwrap();

        let run = tokio::spawn({
            let crawler = Arc::clone(&crawler);
            async move { crawler.run().await }
        });

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(!output.exists());
        assert!(!run.is_finished());

        drop(held);
        let summary = run.await.unwrap().unwrap();

        assert_eq!(summary.recorded, 3);
        let content = std::fs::read_to_string(&output).unwrap();
        assert_eq!(content.lines().count(), 4);
    }

    #[tokio::test]
    async fn test_closed_pool_counts_task_failures() {
        let nightly = r#"<div class="nightly-rate">per night</div>"#;
        let ohio = state_page(&[hotel("Akron", nightly), hotel("Dayton", nightly)]);
        let utah = state_page(&[]);

        let renderer = FakeRenderer::new(&[
            ("https://hotels.test/locations", LOCATIONS),
            ("https://hotels.test/locations/ohio", ohio.as_str()),
            ("https://hotels.test/locations/utah", utah.as_str()),
        ]);
        let dir = TempDir::new().unwrap();
        let crawler = crawler(renderer, &dir, 2);
        crawler.permits.close();

        let summary = crawler.run().await.unwrap();

        assert_eq!(summary.recorded, 0);
        assert_eq!(summary.task_failures, 2);
        assert!(!dir.path().join("data.csv").exists());
    }

    #[tokio::test]
    async fn test_sample_hotel_written_end_to_end() {
        let fragment = HotelFragment(
            r#"<div class="list-view ng-scope">
                <div class="hotel-details">
                    <div class="hotel-name">&nbsp;Sample Inn</div>
                    <div class="hotel-address ng-binding">123 Main St</div>
                    <div class="ta-rating"><img alt="4.5 of 5 bubbles"></div>
                </div>
                <div class="currency ng-binding">$</div>
                <div class="price-whole ng-binding">89</div>
                <div class="price-fraction ng-binding">99</div>
                <div class="nightly-rate ng-binding">per night</div>
            </div>"#
                .to_string(),
        );
        let dir = TempDir::new().unwrap();
        let selectors = Arc::new(Selectors::compile(&SiteLayout::default()).unwrap());
        let extractor = Extractor::new(selectors);
        let recorder = Recorder::new(dir.path().join("data.csv"), QuoteStyle::Raw);

        let record = extractor.extract(&fragment).unwrap();
        recorder.append(&record).await.unwrap();

        let content = std::fs::read_to_string(recorder.path()).unwrap();
        assert_eq!(
            content,
            "name,location,price,frequency,rating\n\
             \"Sample Inn\",\"123 Main St\",\"$89.99\",\"per night\",\"4.5 of 5 bubbles\"\n"
        );
    }

    #[tokio::test]
    async fn test_missing_state_page_aborts_run() {
        let renderer = FakeRenderer::new(&[("https://hotels.test/locations", LOCATIONS)]);
        let dir = TempDir::new().unwrap();

        let err = crawler(renderer, &dir, 4).run().await.unwrap_err();

        assert!(matches!(err, ScoutError::Navigation { .. }));
        assert!(!dir.path().join("data.csv").exists());
    }
}
