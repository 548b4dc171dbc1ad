//! Best-effort normalization of generated source.
//!
//! Two stages, both text-to-text:
//! 1. [`fix_imports`] — parse the source and prune `use` items whose names
//!    are never referenced (the generation step emits imports up front and
//!    not every schema exercises all of them).
//! 2. [`format_canonical`] — reparse and pretty-print into canonical form.
//!
//! [`format_source_and_save`] runs both stages and writes the result. If
//! either stage fails, the original unformatted source is written instead so
//! there is always something on disk to inspect, and the failure is still
//! reported to the caller.
//!
//! The token-based transforms drop plain `//` comments, so the leading
//! comment header (the generated-file banner and any build directive) is
//! split off first and reattached verbatim afterwards.

use std::collections::HashSet;
use std::path::Path;

use proc_macro2::{TokenStream, TokenTree};
use quote::ToTokens;
use syn::{File, Item, UseTree};

use crate::error::{Error, Result};

/// Normalize `source` and write it to `path` (create-or-truncate).
///
/// On normalization failure the original bytes are written instead and the
/// error is returned; the caller decides whether that is fatal. A write
/// failure on the fallback path is ignored — the normalization error is the
/// one worth reporting.
pub fn format_source_and_save(path: &Path, source: &[u8]) -> Result<()> {
    match normalize(source) {
        Ok(formatted) => std::fs::write(path, formatted).map_err(|e| Error::Write {
            path: path.to_path_buf(),
            source: e,
        }),
        Err(e) => {
            // Keep the unformatted version on disk so the failure can be
            // inspected.
            let _ = std::fs::write(path, source);
            Err(e)
        }
    }
}

fn normalize(source: &[u8]) -> Result<Vec<u8>> {
    let text = std::str::from_utf8(source)
        .map_err(|e| Error::Normalize(format!("generated source is not valid UTF-8: {e}")))?;
    let (header, body) = split_comment_header(text);
    let fixed =
        fix_imports(body).map_err(|e| Error::Normalize(format!("import cleanup: {e}")))?;
    let formatted =
        format_canonical(&fixed).map_err(|e| Error::Normalize(format!("formatting: {e}")))?;
    Ok(format!("{header}{formatted}").into_bytes())
}

/// Split off the leading run of plain `//` comment lines and blank lines.
///
/// Doc comments (`///`, `//!`) belong to the syntax tree and stay with the
/// body.
fn split_comment_header(text: &str) -> (&str, &str) {
    let mut end = 0;
    for line in text.split_inclusive('\n') {
        let trimmed = line.trim_start();
        let plain_comment = trimmed.starts_with("//")
            && !trimmed.starts_with("///")
            && !trimmed.starts_with("//!");
        if plain_comment || trimmed.trim_end().is_empty() {
            end += line.len();
        } else {
            break;
        }
    }
    text.split_at(end)
}

/// Stage 1: remove `use` items (and brace-group members) that are never
/// referenced by the rest of the file. Glob imports and `as _` trait imports
/// cannot be proven unused and are always kept.
///
/// Fails if the source does not parse as a Rust file. The output is token
/// text, not formatted source — stage 2 handles layout.
pub fn fix_imports(source: &str) -> syn::Result<String> {
    let mut file: File = syn::parse_file(source)?;
    let mut used = HashSet::new();
    collect_used_idents(&file.items, &mut used);
    prune_items(&mut file.items, &used);
    Ok(file.into_token_stream().to_string())
}

/// Stage 2: pretty-print into canonical form.
///
/// Fails if the input does not parse — independent of stage 1, which only
/// guarantees token-level validity of its own output.
pub fn format_canonical(source: &str) -> syn::Result<String> {
    let file = syn::parse_file(source)?;
    Ok(prettyplease::unparse(&file))
}

fn collect_used_idents(items: &[Item], used: &mut HashSet<String>) {
    for item in items {
        match item {
            Item::Use(_) => {}
            Item::Mod(module) => {
                for attr in &module.attrs {
                    collect_idents(attr.to_token_stream(), used);
                }
                if let Some((_, inner)) = &module.content {
                    collect_used_idents(inner, used);
                }
            }
            other => collect_idents(other.to_token_stream(), used),
        }
    }
}

fn collect_idents(tokens: TokenStream, used: &mut HashSet<String>) {
    for tree in tokens {
        match tree {
            TokenTree::Ident(ident) => {
                used.insert(ident.to_string());
            }
            TokenTree::Group(group) => collect_idents(group.stream(), used),
            _ => {}
        }
    }
}

fn prune_items(items: &mut Vec<Item>, used: &HashSet<String>) {
    items.retain_mut(|item| match item {
        Item::Use(import) => match prune_tree(import.tree.clone(), used) {
            Some(tree) => {
                import.tree = tree;
                true
            }
            None => false,
        },
        Item::Mod(module) => {
            if let Some((_, inner)) = &mut module.content {
                prune_items(inner, used);
            }
            true
        }
        _ => true,
    });
}

fn prune_tree(tree: UseTree, used: &HashSet<String>) -> Option<UseTree> {
    match tree {
        UseTree::Path(mut path) => {
            let inner = (*path.tree).clone();
            prune_tree(inner, used).map(|tree| {
                path.tree = Box::new(tree);
                UseTree::Path(path)
            })
        }
        UseTree::Name(name) => {
            let ident = name.ident.to_string();
            (ident == "self" || used.contains(&ident)).then_some(UseTree::Name(name))
        }
        UseTree::Rename(rename) => {
            let ident = rename.rename.to_string();
            (ident == "_" || used.contains(&ident)).then_some(UseTree::Rename(rename))
        }
        UseTree::Glob(glob) => Some(UseTree::Glob(glob)),
        UseTree::Group(mut group) => {
            let kept: syn::punctuated::Punctuated<UseTree, syn::token::Comma> = group
                .items
                .into_iter()
                .filter_map(|tree| prune_tree(tree, used))
                .collect();
            if kept.is_empty() {
                None
            } else {
                group.items = kept;
                Some(UseTree::Group(group))
            }
        }
    }
}
