//! Named queries.
//!
//! All queries target the user endpoint and are authorized with the user
//! bearer token.

use crate::config::ClientCredentials;
use crate::graphql::{Argument, Operation, Property};
use crate::operations::{credential_arguments, images, metas, ArticleType, OperatorContext, PlatformContext};

/// Verifies a signed payload as the OAuth client.
#[must_use]
pub fn client_payload_verify(credentials: impl Into<ClientCredentials>, payload: &str) -> Operation {
    Operation::query("ClientPayloadVerify")
        .arguments(credential_arguments(credentials))
        .argument("payload", payload)
        .properties(["payload", "status"])
}

/// Fetches the project configuration for a platform and operator.
#[must_use]
pub fn config(platform: PlatformContext, operator: OperatorContext) -> Operation {
    Operation::query("Config")
        .argument("platform_context", platform)
        .argument("operator_context", operator)
        .properties([
            Property::from("project_id"),
            Property::from(("platform", "chromecast_receiver_app_id")),
            Property::from(("language_tags", "key,value")),
        ])
}

/// Looks a user up as the OAuth client, by id when given, else by e-mail.
#[must_use]
pub fn client_user(
    credentials: impl Into<ClientCredentials>,
    user_id: Option<u64>,
    user_email: Option<&str>,
) -> Operation {
    let operation = Operation::query("ClientUser").arguments(credential_arguments(credentials));
    let operation = match (user_id, user_email.filter(|e| !e.is_empty())) {
        (Some(id), _) => operation.argument("id", id),
        (None, Some(email)) => operation.argument("email", email),
        (None, None) => operation,
    };
    operation.properties(["id", "name", "email"])
}

/// Fetches the authenticated user.
#[must_use]
pub fn user_details() -> Operation {
    Operation::query("UserDetails").properties(["id", "email", "name"])
}

/// Lists the subscriptions of the authenticated user.
#[must_use]
pub fn user_subscription_list() -> Operation {
    Operation::query("UserSubscriptionList").list(true).properties([
        "id",
        "subscription_id",
        "suspended_at",
        "suspendable_at",
        "invoiced_at",
        "acquired_at",
        "expires_at",
        "status",
        "status_name",
        "is_valid",
        "is_expired",
        "is_suspendable",
        "is_account_method_changeable",
    ])
}

/// Lists the products of the authenticated user.
#[must_use]
pub fn user_product_list() -> Operation {
    Operation::query("UserProductList").list(true).properties([
        "id",
        "product_id",
        "is_fulfilled",
        "fulfilment_expires_at",
    ])
}

/// Lists the devices paired to the authenticated user.
#[must_use]
pub fn device_list() -> Operation {
    Operation::query("DeviceList")
        .list(true)
        .properties(["id", "name", "uuid", "created_at"])
}

fn article_properties() -> Vec<Property> {
    vec![
        Property::from("id"),
        Property::from("name"),
        Property::from("type"),
        metas(),
        Property::nested(
            "categories",
            [Property::from("id"), Property::from("parent_id"), metas()],
        ),
        images("images"),
        Property::from(("assets", "id,linked_type")),
    ]
}

/// Fetches an article by URL slug when one is given, else by id.
#[must_use]
pub fn article(article_id: u64, url_slug: Option<&str>) -> Operation {
    by_id_or_slug(Operation::query("Article"), article_id, url_slug).properties(article_properties())
}

/// Lists articles, optionally within a category and restricted to types.
#[must_use]
pub fn article_list(category_id: Option<u64>, types: &[ArticleType]) -> Operation {
    let mut operation = Operation::query("ArticleList").list(true);
    if let Some(id) = category_id.filter(|id| *id > 0) {
        operation = operation.argument("category_id", id);
    }
    if !types.is_empty() {
        operation = operation.argument("types", types.to_vec());
    }

    let mut properties = article_properties();
    properties.push(Property::from((
        "products",
        "id,title,call_to_action_tag,price,currency,currency_symbol,expires_in,expires_at",
    )));
    operation.properties(properties)
}

/// Fetches a category by URL slug when one is given, else by id.
#[must_use]
pub fn category(category_id: u64, url_slug: Option<&str>) -> Operation {
    by_id_or_slug(Operation::query("Category"), category_id, url_slug).properties([
        Property::from("id"),
        Property::from("name"),
        Property::from("type"),
        metas(),
        images("images"),
    ])
}

/// Lists categories, optionally below a parent.
#[must_use]
pub fn category_list(parent_id: Option<u64>) -> Operation {
    let mut operation = Operation::query("CategoryList").list(true);
    if let Some(id) = parent_id.filter(|id| *id > 0) {
        operation = operation.argument("parent_id", id);
    }
    operation.properties([
        Property::from("id"),
        Property::from("name"),
        Property::from("type"),
        metas(),
        images("images"),
    ])
}

/// Lists the subscriptions offered through the given payment providers.
#[must_use]
pub fn subscription_list(payment_provider_ids: &[u64]) -> Operation {
    Operation::query("SubscriptionList")
        .list(true)
        .argument("payment_provider_ids", payment_provider_ids.to_vec())
        .properties([
            Property::from("id"),
            Property::from("title"),
            Property::from("description"),
            Property::from("description_short"),
            Property::from("price"),
            Property::from("price_per_installment"),
            Property::from("time_unit"),
            Property::from("time_unit_translation"),
            Property::from("frequency"),
            Property::from("currency"),
            Property::from("currency_symbol"),
            images("images"),
        ])
}

/// Fetches a product.
#[must_use]
pub fn product(product_id: u64) -> Operation {
    Operation::query("Product")
        .argument("id", product_id)
        .properties([
            Property::from("id"),
            Property::from("name"),
            Property::from("type"),
            Property::from("title"),
            Property::from("description"),
            Property::from("description_short"),
            Property::from("call_to_action_tag"),
            Property::from("price"),
            Property::from("currency"),
            Property::from("currency_symbol"),
            images("images"),
        ])
}

/// Lists the products offered through the given payment providers.
#[must_use]
pub fn product_list(payment_provider_ids: &[u64]) -> Operation {
    Operation::query("ProductList")
        .list(true)
        .argument("payment_provider_ids", payment_provider_ids.to_vec())
        .properties([
            Property::from("id"),
            Property::from("type"),
            Property::from("title"),
            Property::from("description"),
            Property::from("description_short"),
            Property::from("call_to_action_tag"),
            Property::from("price"),
            Property::from("currency"),
            Property::from("currency_symbol"),
            Property::from("expires_in"),
            Property::from("expires_at"),
            images("images"),
        ])
}

/// Fetches a page with its components.
#[must_use]
pub fn page(page_id: u64) -> Operation {
    let content = ["id", "title", "content", "url", "value"].map(Property::from);

    let mut elements = content.to_vec();
    elements.extend([images("images"), images("posters")]);

    let mut components = content.to_vec();
    components.extend([
        Property::nested("elements", elements),
        images("images"),
        images("posters"),
    ]);

    Operation::query("Page").argument("id", page_id).properties([
        Property::from("id"),
        Property::from("name"),
        Property::from("full_url_slug"),
        Property::from("type"),
        Property::from("title"),
        Property::nested("components", components),
    ])
}

fn by_id_or_slug(operation: Operation, id: u64, url_slug: Option<&str>) -> Operation {
    match url_slug.filter(|slug| !slug.is_empty()) {
        Some(slug) => operation.argument("url_slug", Argument::from(slug)),
        None => operation.argument("id", id),
    }
}
