//! Path Resolver — dotted-path lookup over the context stack.

use serde_json::Value;

/// One entry of the context stack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Frame<'d> {
    /// A value pushed as-is (the root data, or an object/array section item).
    Record(&'d Value),
    /// A primitive array element, visible only through `{{.}}`.
    Wrapped(&'d Value),
}

/// Context frames ordered outermost first; lookup walks from the back.
pub type ContextStack<'d> = Vec<Frame<'d>>;

/// Resolves `path` against `stack`, innermost frame first.
///
/// `None` means the path is undefined in every frame. `null`, `""`, `0` and
/// `false` are defined values and stop the search.
pub fn resolve<'d>(path: &str, stack: &[Frame<'d>]) -> Option<&'d Value> {
    if path == "." {
        return resolve_current(stack);
    }

    stack.iter().rev().find_map(|frame| match frame {
        Frame::Record(value) => walk(*value, path),
        Frame::Wrapped(_) => None,
    })
}

fn resolve_current<'d>(stack: &[Frame<'d>]) -> Option<&'d Value> {
    let wrapped = stack.iter().rev().find_map(|frame| match frame {
        Frame::Wrapped(value) => Some(*value),
        Frame::Record(_) => None,
    });

    wrapped.or_else(|| {
        stack.iter().rev().find_map(|frame| match frame {
            Frame::Record(value)
                if matches!(value, Value::String(_) | Value::Number(_) | Value::Bool(_)) =>
            {
                Some(*value)
            }
            _ => None,
        })
    })
}

fn walk<'d>(root: &'d Value, path: &str) -> Option<&'d Value> {
    path.split('.').try_fold(root, |current, part| match current {
        Value::Object(map) => map.get(part),
        Value::Array(items) => part.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}
