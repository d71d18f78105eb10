//! Typed resolvers backing the GraphQL schema.
//!
//! Each resolver is a pure function of the parent value, its arguments and
//! the request context. GraphQL plumbing lives in [`super::schema`].

use time::{macros::format_description, OffsetDateTime};

use super::error::{FormatError, ResolveError};
use super::models::Book;
use super::store::BookStore;

/// Per-request data handed to every resolver.
#[derive(Debug, Clone, Copy)]
pub struct ResolveCtx<'a> {
    pub store: &'a BookStore,
}

/// Contract shared by all resolvers.
///
/// `Ok(None)` means the field resolves to `null`; `Err` becomes a field-level
/// GraphQL error.
pub trait Resolver {
    type Parent;
    type Args;
    type Output;

    fn resolve(
        &self,
        parent: Option<&Self::Parent>,
        args: Self::Args,
        ctx: &ResolveCtx<'_>,
    ) -> Result<Option<Self::Output>, ResolveError>;
}

/// `Query.books`
#[derive(Debug, Clone, Copy, Default)]
pub struct BooksResolver;

impl Resolver for BooksResolver {
    type Parent = ();
    type Args = ();
    type Output = Vec<Book>;

    fn resolve(
        &self,
        _parent: Option<&()>,
        _args: (),
        ctx: &ResolveCtx<'_>,
    ) -> Result<Option<Vec<Book>>, ResolveError> {
        Ok(Some(ctx.store.books().to_vec()))
    }
}

/// Arguments of `Query.book`.
#[derive(Debug, Clone, Default)]
pub struct BookArgs {
    /// Raw `ID` text as sent by the client
    pub id: Option<String>,
}

/// `Query.book(id)`
#[derive(Debug, Clone, Copy, Default)]
pub struct BookResolver;

impl Resolver for BookResolver {
    type Parent = ();
    type Args = BookArgs;
    type Output = Book;

    fn resolve(
        &self,
        _parent: Option<&()>,
        args: BookArgs,
        ctx: &ResolveCtx<'_>,
    ) -> Result<Option<Book>, ResolveError> {
        let Some(id) = args.id.as_deref().and_then(parse_book_id) else {
            return Ok(None);
        };

        Ok(ctx.store.find(id).cloned())
    }
}

/// `Book.createdAt`
#[derive(Debug, Clone, Copy, Default)]
pub struct CreatedAtResolver;

impl Resolver for CreatedAtResolver {
    type Parent = Book;
    type Args = ();
    type Output = String;

    fn resolve(
        &self,
        parent: Option<&Book>,
        _args: (),
        _ctx: &ResolveCtx<'_>,
    ) -> Result<Option<String>, ResolveError> {
        let Some(book) = parent else {
            return Ok(None);
        };

        tracing::debug!(?book, "resolving createdAt");

        Ok(Some(format_created_at(book.begin_with)?))
    }
}

/// Parse the leading integer of an `ID` argument.
///
/// Leading whitespace and a sign are skipped, `0x`/`0X` selects hexadecimal,
/// and parsing stops at the first character that is not a digit. Returns
/// `None` when no digit is found or the value overflows `i64`, so such ids
/// never match a book.
pub fn parse_book_id(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, unsigned) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let (radix, digits) = match unsigned.get(..2) {
        Some("0x" | "0X") => (16, &unsigned[2..]),
        _ => (10, unsigned),
    };

    let end = digits
        .find(|c: char| !c.is_digit(radix))
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let magnitude = i64::from_str_radix(&digits[..end], radix).ok()?;
    if negative {
        magnitude.checked_neg()
    } else {
        Some(magnitude)
    }
}

/// Render epoch seconds as an ISO-8601 UTC timestamp with millisecond
/// precision, e.g. `2022-02-22T09:35:10.000Z`.
pub fn format_created_at(begin_with: i64) -> Result<String, FormatError> {
    let out_of_range = || FormatError::OutOfRange {
        seconds: begin_with,
    };

    let millis = begin_with.checked_mul(1000).ok_or_else(out_of_range)?;
    let at = OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000)
        .map_err(|_| out_of_range())?;

    let format = format_description!(
        "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
    );
    Ok(at.format(format)?)
}
