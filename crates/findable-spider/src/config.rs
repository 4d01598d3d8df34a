pub use findable_types::config::CrawlConfig;
