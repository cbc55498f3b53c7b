//! Multi choice whose results are nested under group headers:
//!
//! ```json
//! {
//!   "results": [
//!     { "id": 0, "text": "Ungrouped" },
//!     { "text": "group1", "children": [{ "id": 1, "text": "Some Text" }] }
//!   ],
//!   "more": true
//! }
//! ```

use crate::choice::{Choice, write_choices};
use crate::{ChoiceProvider, Error, Item, Settings};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::marker::PhantomData;

pub trait GroupedValue {
    /// `None` and `Some("")` both mean ungrouped.
    fn group(&self) -> Option<&str>;
}

impl GroupedValue for Item {
    fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }
}

/// A provider of grouped choices.
pub trait GroupedTextChoiceProvider<T>: ChoiceProvider<T>
where
    T: GroupedValue,
{
}

impl<T, P> GroupedTextChoiceProvider<T> for P
where
    T: GroupedValue,
    P: ChoiceProvider<T>,
{
}

/// Choices bucketed by group, buckets in the order their first member appears.
/// The `None` key holds the ungrouped choices.
pub fn group_items<'a, T>(
    choices: impl IntoIterator<Item = &'a T>,
) -> Vec<(Option<&'a str>, Vec<&'a T>)>
where
    T: GroupedValue + 'a,
{
    let mut buckets = Vec::<(Option<&str>, Vec<&T>)>::new();
    let mut index = HashMap::new();
    for choice in choices {
        let key = choice.group().filter(|group| !group.is_empty());
        let i = *index.entry(key).or_insert_with(|| {
            buckets.push((key, Vec::new()));
            buckets.len() - 1
        });
        buckets[i].1.push(choice);
    }
    buckets
}

pub struct Select2GroupedMultiChoice<T, P> {
    provider: P,
    settings: Settings,
    _choice: PhantomData<fn() -> T>,
}

impl<T, P> Select2GroupedMultiChoice<T, P>
where
    T: GroupedValue,
    P: GroupedTextChoiceProvider<T>,
{
    pub fn new(provider: P) -> Self {
        Self::with_settings(provider, Settings::default())
    }

    /// `settings.multiple` is forced on.
    pub fn with_settings(provider: P, mut settings: Settings) -> Self {
        settings.multiple = Some(true);
        Self {
            provider,
            settings,
            _choice: PhantomData,
        }
    }
}

impl<T, P> Choice for Select2GroupedMultiChoice<T, P>
where
    T: GroupedValue + 'static,
    P: GroupedTextChoiceProvider<T> + 'static,
{
    type Item = T;
    type Provider = P;

    fn provider(&self) -> &P {
        &self.provider
    }

    fn settings(&self) -> &Settings {
        &self.settings
    }

    fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    fn write_values(&self, choices: &[T], results: &mut Vec<Value>) -> Result<(), Error> {
        for (group, members) in group_items(choices) {
            match group {
                None => write_choices(&self.provider, members, results)?,
                Some(group) => {
                    let mut children = Vec::with_capacity(members.len());
                    write_choices(&self.provider, members, &mut children)?;
                    let mut object = Map::new();
                    object.insert("text".to_owned(), Value::String(group.to_owned()));
                    object.insert("children".to_owned(), Value::Array(children));
                    results.push(Value::Object(object));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{GroupedValue, Select2GroupedMultiChoice, group_items};
    use crate::{Choice, Item, ListChoiceProvider, Response, TextChoices};
    use serde_json::{Value, json};

    fn item(id: u32, text: &str, group: Option<&str>) -> Item {
        Item {
            id: json!(id),
            text: text.to_owned(),
            group: group.map(str::to_owned),
        }
    }

    fn render(items: Vec<Item>, more: bool) -> anyhow::Result<Value> {
        let provider = TextChoices(ListChoiceProvider::new(Vec::new()));
        let choice = Select2GroupedMultiChoice::<Item, _>::new(provider);
        let mut response = Response::new();
        response.add_all(items);
        response.set_has_more(more);
        Ok(serde_json::from_slice(&choice.write_response(&response)?)?)
    }

    fn find<'a>(results: &'a [Value], text: &str) -> &'a Value {
        results
            .iter()
            .find(|result| result["text"] == text)
            .unwrap()
    }

    #[test]
    fn nests_grouped_items() -> anyhow::Result<()> {
        let output = render(
            vec![
                item(1, "A", None),
                item(2, "B", Some("G1")),
                item(3, "C", Some("G1")),
            ],
            true,
        )?;
        assert_eq!(output["more"], json!(true));
        let results = output["results"].as_array().unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(*find(results, "A"), json!({ "id": 1, "text": "A" }));
        assert_eq!(
            *find(results, "G1"),
            json!({
                "text": "G1",
                "children": [{ "id": 2, "text": "B" }, { "id": 3, "text": "C" }],
            })
        );
        Ok(())
    }

    #[test]
    fn empty_and_missing_groups_merge() {
        let items = [
            item(1, "A", None),
            item(2, "B", Some("")),
            item(3, "C", Some("G")),
            item(4, "D", None),
        ];
        let buckets = group_items(&items);
        let ungrouped = buckets
            .iter()
            .find(|(group, _)| group.is_none())
            .map(|(_, members)| {
                members
                    .iter()
                    .map(|item| item.id.clone())
                    .collect::<Vec<_>>()
            })
            .unwrap();
        assert_eq!(ungrouped, [json!(1), json!(2), json!(4)]);
        assert_eq!(buckets.len(), 2);
    }

    #[test]
    fn ungrouped_items_stay_flat() -> anyhow::Result<()> {
        let output = render(vec![item(1, "A", Some("")), item(2, "B", None)], false)?;
        assert_eq!(
            output,
            json!({
                "results": [{ "id": 1, "text": "A" }, { "id": 2, "text": "B" }],
                "more": false,
            })
        );
        Ok(())
    }

    #[test]
    fn group_members_keep_order() -> anyhow::Result<()> {
        let output = render(
            vec![
                item(1, "x1", Some("X")),
                item(2, "y1", Some("Y")),
                item(3, "x2", Some("X")),
                item(4, "y2", Some("Y")),
                item(5, "x3", Some("X")),
            ],
            false,
        )?;
        let results = output["results"].as_array().unwrap();
        assert_eq!(results.len(), 2);
        let children = |group: &str| {
            find(results, group)["children"]
                .as_array()
                .unwrap()
                .iter()
                .map(|child| child["id"].clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(children("X"), [json!(1), json!(3), json!(5)]);
        assert_eq!(children("Y"), [json!(2), json!(4)]);
        Ok(())
    }

    #[test]
    fn item_group() {
        assert_eq!(item(1, "A", Some("G")).group(), Some("G"));
        assert_eq!(item(1, "A", None).group(), None);
    }

    #[test]
    fn is_multiple() {
        let provider = TextChoices(ListChoiceProvider::new(Vec::new()));
        let choice = Select2GroupedMultiChoice::<Item, _>::new(provider);
        assert_eq!(choice.settings().multiple, Some(true));
    }
}
