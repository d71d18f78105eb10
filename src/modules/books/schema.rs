//! GraphQL type declarations bound to the typed resolvers.

use async_graphql::{
    Context, EmptyMutation, EmptySubscription, ErrorExtensions, Object, Schema, ID,
};
use bookshelf_kernel::settings::GraphQlSettings;

use super::models::Book;
use super::resolvers::{
    BookArgs, BookResolver, BooksResolver, CreatedAtResolver, ResolveCtx, Resolver,
};
use super::store::BookStore;

pub type BookSchema = Schema<QueryRoot, EmptyMutation, EmptySubscription>;

/// Build the executable schema over `store`.
pub fn build_schema(store: BookStore, settings: &GraphQlSettings) -> BookSchema {
    let mut builder = Schema::build(QueryRoot, EmptyMutation, EmptySubscription)
        .data(store)
        .limit_depth(settings.max_depth);
    if !settings.introspection {
        builder = builder.disable_introspection();
    }
    builder.finish()
}

fn resolve_ctx<'a>(ctx: &Context<'a>) -> async_graphql::Result<ResolveCtx<'a>> {
    Ok(ResolveCtx {
        store: ctx.data::<BookStore>()?,
    })
}

pub struct QueryRoot;

#[Object(name = "Query")]
impl QueryRoot {
    /// Every book, in catalogue order.
    async fn books(&self, ctx: &Context<'_>) -> async_graphql::Result<Option<Vec<Option<Book>>>> {
        let books = BooksResolver
            .resolve(None, (), &resolve_ctx(ctx)?)
            .map_err(|err| err.extend())?;
        Ok(books.map(|books| books.into_iter().map(Some).collect()))
    }

    /// The first book whose numeric id matches `id`, or null.
    async fn book(
        &self,
        ctx: &Context<'_>,
        id: Option<ID>,
    ) -> async_graphql::Result<Option<Book>> {
        let args = BookArgs {
            id: id.map(|id| id.0),
        };
        BookResolver
            .resolve(None, args, &resolve_ctx(ctx)?)
            .map_err(|err| err.extend())
    }
}

#[Object]
impl Book {
    async fn id(&self) -> Option<ID> {
        Some(ID(self.id.to_string()))
    }

    async fn title(&self) -> Option<&str> {
        Some(&self.title)
    }

    async fn author(&self) -> Option<&str> {
        Some(&self.author)
    }

    /// Creation time as an ISO-8601 UTC timestamp.
    ///
    /// A timestamp that cannot be rendered is reported in `errors` while the
    /// field itself stays in `data` as `null`.
    async fn created_at(&self, ctx: &Context<'_>) -> async_graphql::Result<Option<String>> {
        match CreatedAtResolver.resolve(Some(self), (), &resolve_ctx(ctx)?) {
            Ok(created_at) => Ok(created_at),
            Err(err) => {
                let error = err.extend().into_server_error(ctx.item.pos);
                ctx.add_error(ctx.set_error_path(error));
                Ok(None)
            }
        }
    }
}
