//! Line-driven session over one long-lived container.
//!
//! Each input line is an event. It runs one container callback and, when the
//! callback succeeds, the mirror is rendered again. Failures are reported and
//! the session carries on with the mirror untouched.

use std::io::{BufRead, Write};

use anyhow::{anyhow, bail, Context, Result};
use items_core::{view, Fields, ItemContainer, Transport};
use uuid::Uuid;

const HELP: &str = "\
commands:
  list                  reload the collection
  get <id>              reload one item
  create <json>         create an item from a JSON object
  update <id> <json>    replace an item's fields
  delete <id>           delete an item
  show                  render the current mirror
  quit                  leave the session";

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    List,
    Get(Uuid),
    Create(Fields),
    Update(Uuid, Fields),
    Delete(Uuid),
    Show,
    Help,
    Quit,
}

/// Parse one input line. Blank lines yield `None`.
pub fn parse_event(line: &str) -> Result<Option<Event>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    let event = match verb {
        "list" | "ls" => Event::List,
        "get" => Event::Get(parse_id(rest)?),
        "create" | "new" => Event::Create(parse_fields(rest)?),
        "update" => {
            let (id, json) = rest
                .split_once(char::is_whitespace)
                .ok_or_else(|| anyhow!("usage: update <id> <json>"))?;
            Event::Update(parse_id(id)?, parse_fields(json)?)
        }
        "delete" | "rm" => Event::Delete(parse_id(rest)?),
        "show" => Event::Show,
        "help" | "?" => Event::Help,
        "quit" | "exit" => Event::Quit,
        other => bail!("unknown command `{other}` (try `help`)"),
    };
    Ok(Some(event))
}

pub fn parse_id(raw: &str) -> Result<Uuid> {
    raw.trim()
        .parse()
        .with_context(|| format!("`{}` is not an item id", raw.trim()))
}

pub fn parse_fields(raw: &str) -> Result<Fields> {
    let value: serde_json::Value =
        serde_json::from_str(raw.trim()).context("fields must be valid JSON")?;
    match value {
        serde_json::Value::Object(fields) => Ok(fields),
        _ => bail!("fields must be a JSON object"),
    }
}

/// Drive `container` from `input` until EOF or `quit`.
pub fn run<T, R, W>(container: &mut ItemContainer<T>, input: R, mut output: W) -> Result<()>
where
    T: Transport,
    R: BufRead,
    W: Write,
{
    for line in input.lines() {
        let line = line.context("failed to read input")?;
        let event = match parse_event(&line) {
            Ok(Some(event)) => event,
            Ok(None) => continue,
            Err(err) => {
                writeln!(output, "error: {err:#}")?;
                continue;
            }
        };
        if event == Event::Quit {
            break;
        }
        if let Err(err) = dispatch(container, event, &mut output) {
            writeln!(output, "error: {err}")?;
        }
    }
    Ok(())
}

fn dispatch<T: Transport, W: Write>(
    container: &mut ItemContainer<T>,
    event: Event,
    output: &mut W,
) -> Result<()> {
    match event {
        Event::List => {
            container.load_all()?;
        }
        Event::Get(id) => {
            let item = container.load_one(id)?;
            writeln!(output, "{}", view::render_item(&item))?;
        }
        Event::Create(fields) => {
            let item = container.create(&fields)?;
            writeln!(output, "created {}", item.id)?;
        }
        Event::Update(id, fields) => {
            container.update(id, &fields)?;
            writeln!(output, "updated {id}")?;
        }
        Event::Delete(id) => {
            container.delete(id)?;
            writeln!(output, "deleted {id}")?;
        }
        Event::Help => {
            writeln!(output, "{HELP}")?;
            return Ok(());
        }
        Event::Show | Event::Quit => {}
    }
    writeln!(output, "{}", view::render_table(container.items()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use items_core::{ApiError, HttpRequest, HttpResponse, ItemClient};
    use serde_json::json;

    use super::*;

    const ID: &str = "00000000-0000-0000-0000-000000000001";

    #[test]
    fn parses_every_command() {
        let id: Uuid = ID.parse().unwrap();
        assert_eq!(parse_event("list").unwrap(), Some(Event::List));
        assert_eq!(parse_event(&format!("get {ID}")).unwrap(), Some(Event::Get(id)));
        assert_eq!(parse_event(&format!("rm {ID}")).unwrap(), Some(Event::Delete(id)));
        assert_eq!(parse_event("  show  ").unwrap(), Some(Event::Show));
        assert_eq!(parse_event("quit").unwrap(), Some(Event::Quit));
        assert_eq!(parse_event("").unwrap(), None);

        let fields = json!({ "title": "a b" }).as_object().unwrap().clone();
        assert_eq!(
            parse_event(r#"create {"title": "a b"}"#).unwrap(),
            Some(Event::Create(fields.clone()))
        );
        assert_eq!(
            parse_event(&format!(r#"update {ID}   {{"title": "a b"}}"#)).unwrap(),
            Some(Event::Update(id, fields))
        );
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse_event("frobnicate").is_err());
        assert!(parse_event("get not-an-id").is_err());
        assert!(parse_event("create [1, 2]").is_err());
        assert!(parse_event("create {oops").is_err());
        assert!(parse_event(&format!("update {ID}")).is_err());
    }

    struct Canned(RefCell<VecDeque<HttpResponse>>);

    impl Transport for Canned {
        fn execute(&self, _request: HttpRequest) -> Result<HttpResponse, ApiError> {
            self.0
                .borrow_mut()
                .pop_front()
                .ok_or_else(|| ApiError::Transport("no response left".to_string()))
        }
    }

    #[test]
    fn session_renders_after_each_event_and_survives_errors() {
        let transport = Canned(RefCell::new(VecDeque::from([
            HttpResponse::new(201, format!(r#"{{"id":"{ID}","title":"Walk"}}"#)),
            HttpResponse::new(500, "boom"),
            HttpResponse::new(204, ""),
        ])));
        let mut container = ItemContainer::new(
            ItemClient::new("http://api.test/").with_resource("notes"),
            transport,
        );
        assert_eq!(container.client().base_url(), "http://api.test");
        assert_eq!(container.client().resource(), "notes");
        let input = format!("create {{\"title\":\"Walk\"}}\nbogus\ndelete {ID}\ndelete {ID}\nquit\nlist\n");
        let mut output = Vec::new();

        run(&mut container, input.as_bytes(), &mut output).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(output.contains(&format!("created {ID}")));
        assert!(output.contains("Walk"));
        assert!(output.contains("error: unknown command `bogus`"));
        assert!(output.contains("error: HTTP 500: boom"));
        assert!(output.contains(&format!("deleted {ID}")));
        assert!(output.trim_end().ends_with("(no items)"));
        assert!(container.items().is_empty());
    }
}
