use super::Config;

impl Config {
    pub(crate) fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("DESCGEN_INPUT") {
            self.dataset.path = v;
        }
        if let Ok(v) = std::env::var("DESCGEN_OUTPUT") {
            self.output.path = v;
        }
        if let Ok(v) = std::env::var("DESCGEN_LLM_BASE_URL") {
            self.llm.base_url = v;
        }
        if let Ok(v) = std::env::var("DESCGEN_LLM_MODEL") {
            self.llm.model = v;
        }
        if let Ok(v) = std::env::var("DESCGEN_LLM_MAX_TOKENS") {
            match v.parse::<u32>() {
                Ok(n) => self.llm.max_tokens = Some(n),
                Err(_) => tracing::warn!("ignoring invalid DESCGEN_LLM_MAX_TOKENS value: {v}"),
            }
        }
        if let Ok(v) = std::env::var("DESCGEN_CONCURRENCY") {
            match v.parse::<usize>() {
                Ok(n) => self.run.concurrency = n,
                Err(_) => tracing::warn!("ignoring invalid DESCGEN_CONCURRENCY value: {v}"),
            }
        }
        if let Ok(v) = std::env::var("DESCGEN_TIMEOUT_CONNECT")
            && let Ok(secs) = v.parse::<u64>()
        {
            self.timeouts.connect_seconds = secs;
        }
        if let Ok(v) = std::env::var("DESCGEN_TIMEOUT_REQUEST")
            && let Ok(secs) = v.parse::<u64>()
        {
            self.timeouts.request_seconds = secs;
        }
    }
}
