use proc_macro::{TokenStream, TokenTree};

/// Splits a `TokenStream` into comma-separated arguments.
///
/// Only commas at the top level separate arguments; anything nested in a
/// delimited group stays inside its argument. A trailing comma is accepted.
pub(crate) fn split_args(input: TokenStream) -> Vec<Vec<TokenTree>> {
    let mut args = Vec::new();
    let mut current = Vec::new();

    for token in input {
        match &token {
            TokenTree::Punct(p) if p.as_char() == ',' => {
                if !current.is_empty() {
                    args.push(current);
                    current = Vec::new();
                }
            }
            _ => current.push(token),
        }
    }

    if !current.is_empty() {
        args.push(current);
    }

    args
}

/// Converts a slice of tokens into a Rust source string.
///
/// Spacing is left to `TokenStream`'s own printing, which keeps adjacent
/// words apart (`async move`, `match 1`, `5 as u64`) and joint punctuation
/// together (`'a`, `::`).
pub(crate) fn tokens_to_string(tokens: &[TokenTree]) -> String {
    tokens.iter().cloned().collect::<TokenStream>().to_string()
}

/// Turns generated source into tokens, or into a `compile_error!` naming
/// the macro that produced it.
pub(crate) fn emit(name: &str, source: String) -> TokenStream {
    source.parse().unwrap_or_else(|err| {
        let msg = format!("{name} macro error: {err}");
        format!("compile_error!({msg:?});").parse().unwrap()
    })
}

/// Replaces the body of an `async fn` with `wrap(body)` and drops the
/// `async` keyword, returning the rewritten item tokens.
///
/// Returns `None` when the item has no brace-delimited body.
pub(crate) fn rewrite_async_fn(
    item: TokenStream,
    wrap: impl FnOnce(String) -> String,
) -> Option<Vec<TokenTree>> {
    let mut tokens: Vec<TokenTree> = item.into_iter().collect();

    if let Some(pos) = tokens
        .iter()
        .position(|t| matches!(t, TokenTree::Ident(id) if id.to_string() == "async"))
    {
        tokens.remove(pos);
    }

    let pos = tokens.iter().rposition(
        |t| matches!(t, TokenTree::Group(g) if g.delimiter() == proc_macro::Delimiter::Brace),
    )?;

    let body = match &tokens[pos] {
        TokenTree::Group(g) => g.stream().to_string(),
        _ => return None,
    };

    let new_body: TokenStream = wrap(body).parse().ok()?;

    tokens[pos] = TokenTree::Group(proc_macro::Group::new(
        proc_macro::Delimiter::Brace,
        new_body,
    ));

    Some(tokens)
}
