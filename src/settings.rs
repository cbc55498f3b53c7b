//! Widget options. Refer to the Select2 documentation for what they mean.
//!
//! Fields holding JavaScript function bodies are emitted unquoted, everything
//! else as JSON. Unset fields are left out of the output.

use crate::script::ObjectWriter;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Settings {
    pub minimum_input_length: Option<u32>,
    pub minimum_results_for_search: Option<i32>,
    pub maximum_selection_size: Option<u32>,
    pub placeholder: Option<serde_json::Value>,
    pub allow_clear: Option<bool>,
    pub multiple: Option<bool>,
    pub close_on_select: Option<bool>,
    /// function
    pub id: Option<String>,
    /// function
    pub matcher: Option<String>,
    /// function
    pub tokenizer: Option<String>,
    /// function
    pub format_selection: Option<String>,
    /// function
    pub format_result: Option<String>,
    /// function
    pub format_no_matches: Option<String>,
    /// function
    pub format_input_too_short: Option<String>,
    /// function
    pub format_result_css_class: Option<String>,
    /// function
    pub format_selection_too_big: Option<String>,
    /// function
    pub format_load_more: Option<String>,
    /// function
    pub format_searching: Option<String>,
    /// function
    pub create_search_choice: Option<String>,
    /// function
    pub init_selection: Option<String>,
    /// function
    pub query: Option<String>,
    pub width: Option<String>,
    pub open_on_enter: Option<bool>,
    pub container_css: Option<String>,
    pub container_css_class: Option<String>,
    pub dropdown_css: Option<String>,
    pub dropdown_css_class: Option<String>,
    pub separator: Option<String>,
    pub token_separators: Option<Vec<String>>,
    pub ajax: AjaxSettings,
    /// function
    pub data: Option<String>,
    /// function
    pub tags: Option<String>,
}

impl Settings {
    pub fn to_json(&self) -> serde_json::Result<String> {
        let mut writer = ObjectWriter::new();
        writer
            .value("minimumInputLength", self.minimum_input_length.as_ref())?
            .value(
                "minimumResultsForSearch",
                self.minimum_results_for_search.as_ref(),
            )?
            .value("maximumSelectionSize", self.maximum_selection_size.as_ref())?
            .value("placeholder", self.placeholder.as_ref())?
            .value("allowClear", self.allow_clear.as_ref())?
            .value("multiple", self.multiple.as_ref())?
            .value("closeOnSelect", self.close_on_select.as_ref())?
            .function("id", self.id.as_deref())?
            .function("matcher", self.matcher.as_deref())?
            .function("tokenizer", self.tokenizer.as_deref())?
            .function("formatSelection", self.format_selection.as_deref())?
            .function("formatResult", self.format_result.as_deref())?
            .function("formatNoMatches", self.format_no_matches.as_deref())?
            .function("formatInputTooShort", self.format_input_too_short.as_deref())?
            .function(
                "formatResultCssClass",
                self.format_result_css_class.as_deref(),
            )?
            .function(
                "formatSelectionTooBig",
                self.format_selection_too_big.as_deref(),
            )?
            .function("formatLoadMore", self.format_load_more.as_deref())?
            .function("formatSearching", self.format_searching.as_deref())?
            .function("createSearchChoice", self.create_search_choice.as_deref())?
            .function("initSelection", self.init_selection.as_deref())?
            .function("query", self.query.as_deref())?
            .value("width", self.width.as_deref())?
            .value("openOnEnter", self.open_on_enter.as_ref())?
            .value("containerCss", self.container_css.as_deref())?
            .value("containerCssClass", self.container_css_class.as_deref())?
            .value("dropdownCss", self.dropdown_css.as_deref())?
            .value("dropdownCssClass", self.dropdown_css_class.as_deref())?
            .value("separator", self.separator.as_deref())?
            .value("tokenSeparators", self.token_separators.as_deref())?
            .raw("ajax", &self.ajax.to_json()?)?
            .function("data", self.data.as_deref())?
            .function("tags", self.tags.as_deref())?;
        Ok(writer.finish())
    }
}

/// Options of the remote query endpoint.
#[derive(Clone, Debug, PartialEq)]
pub struct AjaxSettings {
    pub url: Option<String>,
    pub data_type: Option<String>,
    pub quiet_millis: Option<u32>,
    pub cache: Option<bool>,
    pub jsonp_callback: Option<String>,
    /// function building the request parameters from the term and page
    pub data: Option<String>,
    /// function mapping the response body to the widget's result shape
    pub results: Option<String>,
}

impl AjaxSettings {
    pub const DEFAULT_DATA: &'static str = "function(term, page) { return { term: term, page: page }; }";
    pub const DEFAULT_RESULTS: &'static str = "function(data, page) { return data; }";

    pub fn to_json(&self) -> serde_json::Result<String> {
        let mut writer = ObjectWriter::new();
        writer
            .value("url", self.url.as_deref())?
            .value("dataType", self.data_type.as_deref())?
            .value("quietMillis", self.quiet_millis.as_ref())?
            .value("cache", self.cache.as_ref())?
            .value("jsonpCallback", self.jsonp_callback.as_deref())?
            .function("data", self.data.as_deref())?
            .function("results", self.results.as_deref())?;
        Ok(writer.finish())
    }
}

impl Default for AjaxSettings {
    fn default() -> Self {
        Self {
            url: None,
            data_type: Some("json".to_owned()),
            quiet_millis: None,
            cache: None,
            jsonp_callback: None,
            data: Some(Self::DEFAULT_DATA.to_owned()),
            results: Some(Self::DEFAULT_RESULTS.to_owned()),
        }
    }
}
