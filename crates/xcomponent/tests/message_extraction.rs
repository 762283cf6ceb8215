//! Tests for translatable message extraction.

use std::collections::HashMap;
use std::io::{Seek, SeekFrom, Write};

use xcomponent::extract::{ExtractError, ExtractedMessage, extract, extract_from_markup};
use xcomponent::parse_markup;

const NO_KEYWORDS: &[&str] = &[];

fn from_markup(raw: &str) -> Vec<(usize, String, String, String)> {
    let node = parse_markup(&format!("<>{raw}</>")).unwrap();
    extract_from_markup(&node, 1, NO_KEYWORDS)
        .iter()
        .map(|m| {
            let (line, funcname, message, comments) = m.as_tuple();
            (
                line,
                funcname.to_string(),
                message.to_string(),
                comments.to_string(),
            )
        })
        .collect()
}

fn tuple(message: &str) -> (usize, String, String, String) {
    (1, String::new(), message.to_string(), String::new())
}

fn extract_str(source: &str, options: &HashMap<String, String>) -> Vec<ExtractedMessage> {
    extract(source.as_bytes(), NO_KEYWORDS, &["TRANSLATORS:"], options).unwrap()
}

// =============================================================================
// Markup
// =============================================================================

#[test]
fn small() {
    assert_eq!(
        from_markup("{globals.gettext('a small text')}"),
        vec![tuple("a small text")]
    );
}

#[test]
fn multiline() {
    let raw = "
            {
                globals.gettext(
                    '''
                    a multiline text
                    '''
                )
            }
            ";
    assert_eq!(from_markup(raw), vec![tuple("a multiline text\n")]);
}

#[test]
fn nested() {
    let raw = "
            <div>
                <span>
                    {
                        globals.gettext(
                            '''a small text'''
                        )
                    }
                </span>
            </div>
            ";
    assert_eq!(from_markup(raw), vec![tuple("a small text")]);
}

#[test]
fn attributes_before_children() {
    let raw = r#"
            <div>
                <span aria-label={globals.gettext("a small desc")}>
                    {
                        globals.gettext(
                            '''a small text'''
                        )
                    }
                </span>
            </div>
            "#;
    assert_eq!(
        from_markup(raw),
        vec![tuple("a small desc"), tuple("a small text")]
    );
}

#[test]
fn context_is_nearest_tag() {
    let node =
        parse_markup("<div><span aria-label={gettext('desc')}/>{gettext('body')}</div>").unwrap();
    let contexts: Vec<String> = extract_from_markup(&node, 1, NO_KEYWORDS)
        .into_iter()
        .map(|m| m.context)
        .collect();
    assert_eq!(contexts, vec!["span", "div"]);
}

// =============================================================================
// Host source
// =============================================================================

const HOST_SOURCE: &str = r#"from xcomponent import Catalog

catalog = Catalog()


@catalog.component
def Greeting(name: str) -> str:
    # TRANSLATORS: shown on the home page
    return """
        <p title={globals.gettext('Greeting')}>
            {globals.ngettext('One visitor', 'Many visitors', count)}
        </p>
    """


def plain():
    return "no markup here"


def not_markup():
    return "<p>{unclosed"
"#;

#[test]
fn extract_from_host_source() {
    let messages = extract_str(HOST_SOURCE, &HashMap::new());
    let found: Vec<(usize, &str, &str, &str)> =
        messages.iter().map(ExtractedMessage::as_tuple).collect();
    assert_eq!(
        found,
        vec![
            (9, "", "Greeting", "TRANSLATORS: shown on the home page"),
            (9, "", "One visitor", "TRANSLATORS: shown on the home page"),
            (9, "", "Many visitors", "TRANSLATORS: shown on the home page"),
        ]
    );
    assert_eq!(messages[0].context, "p");
}

#[test]
fn extract_from_file() {
    let mut file = tempfile::tempfile().unwrap();
    file.write_all(HOST_SOURCE.as_bytes()).unwrap();
    file.seek(SeekFrom::Start(0)).unwrap();

    let messages = extract(file, &["gettext"], NO_KEYWORDS, &HashMap::new()).unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].message, "Greeting");
    assert_eq!(messages[0].comments, "");
}

#[test]
fn latin1_source() {
    let mut bytes = b"x = '<p>{gettext(\"caf".to_vec();
    bytes.push(0xE9);
    bytes.extend_from_slice(b"\")}</p>'\n");
    let options = HashMap::from([("encoding".to_string(), "latin-1".to_string())]);

    let messages = extract(bytes.as_slice(), NO_KEYWORDS, NO_KEYWORDS, &options).unwrap();
    assert_eq!(messages[0].message, "café");

    let err = extract(bytes.as_slice(), NO_KEYWORDS, NO_KEYWORDS, &HashMap::new()).unwrap_err();
    assert!(matches!(err, ExtractError::InvalidEncoding { offset: 21, .. }));
}

#[test]
fn unknown_encoding() {
    let options = HashMap::from([("encoding".to_string(), "klingon".to_string())]);
    let err = extract(&b""[..], NO_KEYWORDS, NO_KEYWORDS, &options).unwrap_err();
    assert_eq!(err.to_string(), "unsupported encoding 'klingon'");
}

#[test]
fn messages_serialize_to_json() {
    let messages = extract_str("t = '<b>{gettext(\"Hi\")}</b>'", &HashMap::new());
    let json = serde_json::to_value(&messages).unwrap();
    assert_eq!(
        json,
        serde_json::json!([{
            "lineno": 1,
            "funcname": "",
            "message": "Hi",
            "comments": "",
            "context": "b",
        }])
    );
}
