use crate::dataset::CompanyRecord;

pub const SYSTEM_PROMPT: &str = "\
You are a helpful assistant that generates company descriptions.
Ensure the descriptions you generate are concise yet informative, typically between 100 to 300 words.
Provide a clear overview of the company's mission, products or services, target market, and unique value proposition.

Input format:
### Company Name
The name of the company.

### Industry Classification
The industry classification codes of the company.

### Top 5 Most Frequent Words
The top 5 most frequent words from the company's homepage.

### Cleaned HTML Content
The cleaned HTML content of the company's homepage.

Output format:
Company Description single paragraph of 100 to 300 words.";

/// User message sent for a single company.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptDocument(String);

impl PromptDocument {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[must_use]
pub fn build_prompt(record: &CompanyRecord) -> PromptDocument {
    PromptDocument(format!(
        "### Company Name\n{}\n\n\
         ### Industry Classification\n{}\n\n\
         ### Top 5 Most Frequent Words\n{}\n\n\
         ### Cleaned HTML Content\n{}\n",
        record.name,
        record.sic,
        format_words(&record.top_5_most_frequent_words),
        record.cleaned_html,
    ))
}

fn format_words(words: &[String]) -> String {
    let quoted: Vec<String> = words.iter().map(|w| format!("'{w}'")).collect();
    format!("[{}]", quoted.join(", "))
}
