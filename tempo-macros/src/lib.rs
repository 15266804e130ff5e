//! Procedural macros re-exported by `tempo`.
//!
//! - `join!` polls several futures concurrently and yields a tuple of their
//!   outputs in argument order.
//! - `try_join!` does the same for fallible futures, stopping at the first
//!   error.
//! - `#[tempo::test]` runs an `async fn` test on a fresh runtime.

mod utils;

use proc_macro::{TokenStream, TokenTree};

#[proc_macro]
pub fn join(input: TokenStream) -> TokenStream {
    let args = utils::split_args(input);
    let count = args.len();

    if count == 0 {
        return "()".parse().unwrap();
    }

    if count == 1 {
        let expr = utils::tokens_to_string(&args[0]);
        return utils::emit("join", format!("{{ ({expr}).await }}"));
    }

    let mut output = String::new();
    output.push_str("{\n");

    for (i, expr_tokens) in args.iter().enumerate() {
        let idx = i + 1;
        let expr = utils::tokens_to_string(expr_tokens);
        output.push_str(&format!(
            "let mut __f{idx} = (::std::boxed::Box::pin({expr}), ::core::option::Option::None::<_>);\n"
        ));
    }

    output.push_str("::std::future::poll_fn(move |cx| {\n");
    output.push_str("    use ::std::future::Future;\n");
    output.push_str("    use ::std::task::Poll;\n");

    for i in 1..=count {
        output.push_str(&format!(
            "    if __f{i}.1.is_none() {{\n\
                    if let Poll::Ready(val) = __f{i}.0.as_mut().poll(cx) {{\n\
                        __f{i}.1 = ::core::option::Option::Some(val);\n\
                    }}\n\
                }}\n"
        ));
    }

    output.push_str(&all_done(count));
    output.push_str("        Poll::Ready((\n");
    output.push_str(&take_all(count));
    output.push_str("        ))\n");
    output.push_str("    } else {\n");
    output.push_str("        Poll::Pending\n");
    output.push_str("    }\n");
    output.push_str("}).await\n");
    output.push_str("}\n");

    utils::emit("join", output)
}

/// Like `join!`, but every future must yield a `Result` with the same error
/// type. Resolves to `Err` as soon as any future fails; the remaining
/// futures are dropped without being polled again.
#[proc_macro]
pub fn try_join(input: TokenStream) -> TokenStream {
    let args = utils::split_args(input);
    let count = args.len();

    if count == 0 {
        return "::core::result::Result::Ok(())".parse().unwrap();
    }

    let mut output = String::new();
    output.push_str("{\n");

    for (i, expr_tokens) in args.iter().enumerate() {
        let idx = i + 1;
        let expr = utils::tokens_to_string(expr_tokens);
        output.push_str(&format!(
            "let mut __f{idx} = (::std::boxed::Box::pin({expr}), ::core::option::Option::None::<_>);\n"
        ));
    }

    output.push_str("::std::future::poll_fn(move |cx| {\n");
    output.push_str("    use ::std::future::Future;\n");
    output.push_str("    use ::std::task::Poll;\n");

    for i in 1..=count {
        output.push_str(&format!(
            "    if __f{i}.1.is_none() {{\n\
                    match __f{i}.0.as_mut().poll(cx) {{\n\
                        Poll::Ready(::core::result::Result::Ok(val)) => {{\n\
                            __f{i}.1 = ::core::option::Option::Some(val);\n\
                        }}\n\
                        Poll::Ready(::core::result::Result::Err(err)) => {{\n\
                            return Poll::Ready(::core::result::Result::Err(err));\n\
                        }}\n\
                        Poll::Pending => {{}}\n\
                    }}\n\
                }}\n"
        ));
    }

    output.push_str(&all_done(count));
    output.push_str("        Poll::Ready(::core::result::Result::Ok((\n");
    output.push_str(&take_all(count));
    output.push_str("        )))\n");
    output.push_str("    } else {\n");
    output.push_str("        Poll::Pending\n");
    output.push_str("    }\n");
    output.push_str("}).await\n");
    output.push_str("}\n");

    utils::emit("try_join", output)
}

fn all_done(count: usize) -> String {
    let cond = (1..=count)
        .map(|i| format!("__f{i}.1.is_some()"))
        .collect::<Vec<_>>()
        .join(" && ");

    format!("    if {cond} {{\n")
}

fn take_all(count: usize) -> String {
    (1..=count)
        .map(|i| {
            format!(
                "            __f{i}.1.take().expect(\"joined future already taken\"),\n"
            )
        })
        .collect()
}

#[proc_macro_attribute]
pub fn test(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let rewritten = utils::rewrite_async_fn(item, |body| {
        format!(
            "{{
            let runtime = ::tempo::RuntimeBuilder::new()
                .build()
                .expect(\"failed to start the tempo runtime\");
            runtime.block_on(async move {{ {body} }});
        }}"
        )
    });

    let Some(tokens) = rewritten else {
        return "compile_error!(\"#[tempo::test] expects an async fn with a body\");"
            .parse()
            .unwrap();
    };

    let test_attr: TokenStream = "#[test]".parse().unwrap();
    let mut result: Vec<TokenTree> = test_attr.into_iter().collect();
    result.extend(tokens);

    result.into_iter().collect()
}
