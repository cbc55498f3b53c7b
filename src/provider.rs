use crate::Response;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Supplies the choices shown by the widget.
///
/// A provider is shared by every request hitting its endpoint, so it has to be
/// usable from several requests at once.
pub trait ChoiceProvider<T>: Send + Sync {
    /// Fills `response` with the choices matching `term` on the 0-based `page`
    /// and tells whether another page follows. The page size is up to the provider.
    fn query(&self, term: Option<&str>, page: usize, response: &mut Response<T>)
    -> anyhow::Result<()>;

    /// Writes the fields of `choice` into the object representing it, at least
    /// `id` and `text`.
    fn to_json(&self, choice: &T, object: &mut Map<String, Value>) -> anyhow::Result<()>;

    /// Called once at the end of every request cycle.
    fn detach(&self) {}
}

/// A provider whose choices render as plain `{ "id": .., "text": .. }` objects.
///
/// Wrap it in [`TextChoices`] to use it as a [`ChoiceProvider`].
pub trait TextChoiceProvider<T>: Send + Sync {
    fn display_text(&self, choice: &T) -> String;

    fn id(&self, choice: &T) -> Value;

    fn query(&self, term: Option<&str>, page: usize, response: &mut Response<T>)
    -> anyhow::Result<()>;

    fn detach(&self) {}
}

#[derive(Clone, Debug, Default)]
pub struct TextChoices<P>(pub P);

impl<T, P> ChoiceProvider<T> for TextChoices<P>
where
    P: TextChoiceProvider<T>,
{
    fn query(
        &self,
        term: Option<&str>,
        page: usize,
        response: &mut Response<T>,
    ) -> anyhow::Result<()> {
        self.0.query(term, page, response)
    }

    fn to_json(&self, choice: &T, object: &mut Map<String, Value>) -> anyhow::Result<()> {
        object.insert("id".to_owned(), self.0.id(choice));
        object.insert("text".to_owned(), Value::String(self.0.display_text(choice)));
        Ok(())
    }

    fn detach(&self) {
        self.0.detach();
    }
}

/// A choice as read from a data file.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Item {
    pub id: Value,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

/// Serves a fixed list of items, matching the term case-insensitively
/// anywhere in their text.
#[derive(Clone, Debug)]
pub struct ListChoiceProvider {
    items: Vec<Item>,
    page_size: usize,
}

impl ListChoiceProvider {
    pub const DEFAULT_PAGE_SIZE: usize = 10;

    pub fn new(items: Vec<Item>) -> Self {
        Self::with_page_size(items, Self::DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(items: Vec<Item>, page_size: usize) -> Self {
        Self {
            items,
            page_size: page_size.max(1),
        }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }
}

impl TextChoiceProvider<Item> for ListChoiceProvider {
    fn display_text(&self, choice: &Item) -> String {
        choice.text.clone()
    }

    fn id(&self, choice: &Item) -> Value {
        choice.id.clone()
    }

    fn query(
        &self,
        term: Option<&str>,
        page: usize,
        response: &mut Response<Item>,
    ) -> anyhow::Result<()> {
        let term = term.map(str::to_lowercase);
        let mut matches = self
            .items
            .iter()
            .filter(|item| {
                term.as_deref()
                    .is_none_or(|term| item.text.to_lowercase().contains(term))
            })
            .skip(page.saturating_mul(self.page_size));
        response.add_all(matches.by_ref().take(self.page_size).cloned());
        response.set_has_more(matches.next().is_some());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ChoiceProvider, Item, ListChoiceProvider, TextChoices};
    use crate::Response;
    use serde_json::{Map, json};

    fn items() -> Vec<Item> {
        ["Alpha", "beta", "Gamma", "Alphabet", "delta"]
            .into_iter()
            .enumerate()
            .map(|(i, text)| Item {
                id: json!(i),
                text: text.to_owned(),
                group: None,
            })
            .collect()
    }

    fn texts(response: &Response<Item>) -> Vec<&str> {
        response.iter().map(|item| item.text.as_str()).collect()
    }

    #[test]
    fn pages_through_everything_without_term() -> anyhow::Result<()> {
        let provider = TextChoices(ListChoiceProvider::with_page_size(items(), 2));

        let mut response = Response::new();
        provider.query(None, 0, &mut response)?;
        assert_eq!(texts(&response), ["Alpha", "beta"]);
        assert!(response.has_more());

        let mut response = Response::new();
        provider.query(None, 2, &mut response)?;
        assert_eq!(texts(&response), ["delta"]);
        assert!(!response.has_more());
        Ok(())
    }

    #[test]
    fn matches_ignoring_case() -> anyhow::Result<()> {
        let provider = TextChoices(ListChoiceProvider::new(items()));
        let mut response = Response::new();
        provider.query(Some("ALPHA"), 0, &mut response)?;
        assert_eq!(texts(&response), ["Alpha", "Alphabet"]);
        assert!(!response.has_more());
        Ok(())
    }

    #[test]
    fn exact_page_boundary_has_no_more() -> anyhow::Result<()> {
        let provider = TextChoices(ListChoiceProvider::with_page_size(items(), 5));
        let mut response = Response::new();
        provider.query(None, 0, &mut response)?;
        assert_eq!(response.len(), 5);
        assert!(!response.has_more());
        Ok(())
    }

    #[test]
    fn renders_id_and_text() -> anyhow::Result<()> {
        let provider = TextChoices(ListChoiceProvider::new(Vec::new()));
        let mut object = Map::new();
        provider.to_json(
            &Item {
                id: json!("x"),
                text: "X".to_owned(),
                group: Some("G".to_owned()),
            },
            &mut object,
        )?;
        assert_eq!(json!(object), json!({ "id": "x", "text": "X" }));
        Ok(())
    }
}
