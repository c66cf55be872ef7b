mod conditions;
mod dialects;
mod statements;

use crate::ast::Reference;
use crate::ast::builders::*;
use crate::metadata::{
    CacheConfig, EntityDecl, JoinDecl, JoinKind, MetadataRegistry, PropertyDecl, SqlType,
};
use crate::registry::SqlRegistry;
use crate::transpiler::Dialect;

/// Blog/Author/Post schema shared by the transpiler tests.
pub(crate) fn blog_registry(dialect: Dialect) -> SqlRegistry {
    let registry = SqlRegistry::new(MetadataRegistry::default(), dialect);
    let decls = vec![
        EntityDecl::new("Blog")
            .property(PropertyDecl::new("id").id().alias("id"))
            .property(PropertyDecl::new("authorId"))
            .property(PropertyDecl::new("title")),
        EntityDecl::new("Author")
            .cache(
                CacheConfig::new()
                    .read_write(true)
                    .flush_interval(-1)
                    .property("param1", "value1"),
            )
            .property(
                PropertyDecl::new("id")
                    .id()
                    .alias("id")
                    .sql_type(SqlType::Integer),
            )
            .property(PropertyDecl::new("username"))
            .property(PropertyDecl::new("email").type_handler("StringTypeHandler"))
            .property(PropertyDecl::new("favouriteSection").column("favourite_section")),
        EntityDecl::new("PostLite")
            .table("post")
            .join(JoinDecl::new(
                "joinBlog",
                "Blog",
                eq("blogId", Reference::of("joinBlog.#id")),
            ))
            .join(JoinDecl::new(
                "joinAuthor",
                "Author",
                eq("authorId", Reference::of("joinAuthor.#id")),
            ))
            .property(PropertyDecl::new("id").id().generated().alias("id"))
            .property(PropertyDecl::new("blogId"))
            .property(PropertyDecl::new("authorId"))
            .property(PropertyDecl::new("createdOn").alias("CreateDate"))
            .property(PropertyDecl::new("subject"))
            .property(PropertyDecl::new("star").sql_type(SqlType::Integer))
            .property(PropertyDecl::new("createTime").alias("ct").reference("createdOn"))
            .property(PropertyDecl::new("authorName").reference("joinAuthor.username"))
            .property(PropertyDecl::new("blogTitle").reference("joinBlog.title")),
        EntityDecl::new("Post")
            .extends("PostLite")
            .join(JoinDecl::new(
                "authorOfBlog",
                "Author",
                eq("authorOfBlog.id", Reference::of("joinBlog.authorId")),
            ))
            .property(PropertyDecl::new("blogAuthorName").reference("authorOfBlog.username")),
        EntityDecl::new("PostOfSally")
            .extends("PostLite")
            .join(
                JoinDecl::new(
                    "joinAuthorNamed",
                    "Author",
                    and(vec![
                        eq("authorId", Reference::of("joinAuthorNamed.#id")),
                        eq("joinAuthorNamed.username", "sally"),
                    ]),
                )
                .kind(JoinKind::Inner),
            )
            .property(
                PropertyDecl::new("authorNamedSally").reference("joinAuthorNamed.username"),
            ),
        EntityDecl::new("User")
            .property(PropertyDecl::new("id").id())
            .property(PropertyDecl::new("a"))
            .property(PropertyDecl::new("age").sql_type(SqlType::Integer))
            .property(PropertyDecl::new("name").type_handler("StringTypeHandler")),
    ];
    for decl in decls {
        registry.register(decl).unwrap();
    }
    registry
}
