use std::collections::HashMap;

use meili_core::{Embedder, Faceting, Pagination, Settings, TaskInfo, TypoTolerance};

use crate::{
  error::Result,
  executor::{Request, call},
  index::Index,
};

/// Expands to the get/update/reset triple of one settings sub-route.
macro_rules! setting {
  ($path:literal, $name:literal, $method:ident, $get:ident -> $out:ty, $update:ident($in:ty), $reset:ident) => {
    pub async fn $get(&self) -> Result<$out> {
      let request = Request::get(self.endpoint(concat!("/settings/", $path)), concat!("Get", $name));
      call(self.executor(), request, &self.cancel).await
    }

    pub async fn $update(&self, value: $in) -> Result<TaskInfo> {
      let request = Request::$method(self.endpoint(concat!("/settings/", $path)), concat!("Update", $name))
        .accept_task()
        .json(&value)?;
      call(self.executor(), request, &self.cancel).await
    }

    pub async fn $reset(&self) -> Result<TaskInfo> {
      let request =
        Request::delete(self.endpoint(concat!("/settings/", $path)), concat!("Reset", $name)).accept_task();
      call(self.executor(), request, &self.cancel).await
    }
  };
}

impl Index {
  pub async fn get_settings(&self) -> Result<Settings> {
    call(self.executor(), Request::get(self.endpoint("/settings"), "GetSettings"), &self.cancel).await
  }

  /// Partially update settings: only the fields set in `settings` change.
  pub async fn update_settings(&self, settings: &Settings) -> Result<TaskInfo> {
    let request = Request::patch(self.endpoint("/settings"), "UpdateSettings")
      .accept_task()
      .json(settings)?;
    call(self.executor(), request, &self.cancel).await
  }

  pub async fn reset_settings(&self) -> Result<TaskInfo> {
    let request = Request::delete(self.endpoint("/settings"), "ResetSettings").accept_task();
    call(self.executor(), request, &self.cancel).await
  }

  setting!("ranking-rules", "RankingRules", put,
    get_ranking_rules -> Vec<String>, update_ranking_rules(&[String]), reset_ranking_rules);
  setting!("distinct-attribute", "DistinctAttribute", put,
    get_distinct_attribute -> Option<String>, update_distinct_attribute(&str), reset_distinct_attribute);
  setting!("searchable-attributes", "SearchableAttributes", put,
    get_searchable_attributes -> Vec<String>, update_searchable_attributes(&[String]), reset_searchable_attributes);
  setting!("displayed-attributes", "DisplayedAttributes", put,
    get_displayed_attributes -> Vec<String>, update_displayed_attributes(&[String]), reset_displayed_attributes);
  setting!("stop-words", "StopWords", put,
    get_stop_words -> Vec<String>, update_stop_words(&[String]), reset_stop_words);
  setting!("synonyms", "Synonyms", put,
    get_synonyms -> HashMap<String, Vec<String>>, update_synonyms(&HashMap<String, Vec<String>>), reset_synonyms);
  setting!("filterable-attributes", "FilterableAttributes", put,
    get_filterable_attributes -> Vec<String>, update_filterable_attributes(&[String]), reset_filterable_attributes);
  setting!("sortable-attributes", "SortableAttributes", put,
    get_sortable_attributes -> Vec<String>, update_sortable_attributes(&[String]), reset_sortable_attributes);
  setting!("separator-tokens", "SeparatorTokens", put,
    get_separator_tokens -> Vec<String>, update_separator_tokens(&[String]), reset_separator_tokens);
  setting!("non-separator-tokens", "NonSeparatorTokens", put,
    get_non_separator_tokens -> Vec<String>, update_non_separator_tokens(&[String]), reset_non_separator_tokens);
  setting!("dictionary", "Dictionary", put,
    get_dictionary -> Vec<String>, update_dictionary(&[String]), reset_dictionary);
  setting!("search-cutoff-ms", "SearchCutoffMs", put,
    get_search_cutoff_ms -> Option<u64>, update_search_cutoff_ms(u64), reset_search_cutoff_ms);
  setting!("typo-tolerance", "TypoTolerance", patch,
    get_typo_tolerance -> TypoTolerance, update_typo_tolerance(&TypoTolerance), reset_typo_tolerance);
  setting!("pagination", "Pagination", patch,
    get_pagination -> Pagination, update_pagination(&Pagination), reset_pagination);
  setting!("faceting", "Faceting", patch,
    get_faceting -> Faceting, update_faceting(&Faceting), reset_faceting);
  setting!("embedders", "Embedders", patch,
    get_embedders -> HashMap<String, Embedder>, update_embedders(&HashMap<String, Embedder>), reset_embedders);
}
