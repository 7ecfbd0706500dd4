//! Named mutations.
//!
//! Authentication mutations are authorized as the OAuth client; everything
//! else runs as the user against the user endpoint.

use chrono::{DateTime, Utc};

use crate::auth::{AgentKind, Scope};
use crate::config::ClientCredentials;
use crate::graphql::{Argument, Operation, OperationType, Property};
use crate::operations::{credential_arguments, EntitlementAction, AUTHENTICATION_FIELDS};

/// Timestamp format for `expires_at` arguments.
const EXPIRES_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Fields returned by the payment mutations.
const PAYMENT_FIELDS: [&str; 6] = [
    "status",
    "price",
    "title",
    "description_short",
    "payment_url",
    "user_payment_account_order_id",
];

/// Authenticates the OAuth client against the admin endpoint.
#[must_use]
pub fn admin_client_authenticate(credentials: impl Into<ClientCredentials>) -> Operation {
    Operation::new(
        OperationType::Mutation,
        "ClientAuthenticate",
        AgentKind::Client,
        Scope::Admin,
    )
    .arguments(credential_arguments(credentials))
    .properties(AUTHENTICATION_FIELDS)
}

/// Authenticates the OAuth client against the user endpoint.
#[must_use]
pub fn client_authenticate(credentials: impl Into<ClientCredentials>) -> Operation {
    Operation::new(
        OperationType::Mutation,
        "ClientAuthenticate",
        AgentKind::Client,
        Scope::User,
    )
    .arguments(credential_arguments(credentials))
    .properties(AUTHENTICATION_FIELDS)
}

/// Authenticates a user as the OAuth client.
///
/// The user is identified by `user_id` when given. Otherwise `user_email` is
/// used, together with `auto_register`, which registers an unknown e-mail
/// address as a new user.
#[must_use]
pub fn client_user_authenticate(
    credentials: impl Into<ClientCredentials>,
    user_id: Option<u64>,
    user_email: Option<&str>,
    auto_register: bool,
) -> Operation {
    let operation =
        Operation::mutation("ClientUserAuthenticate").arguments(credential_arguments(credentials));
    let operation = match (user_id.filter(|id| *id > 0), user_email.filter(|e| !e.is_empty())) {
        (Some(id), _) => operation.argument("user_id", id),
        (None, Some(email)) => operation
            .argument("user_email", email)
            .argument("auto_register", auto_register),
        (None, None) => operation,
    };
    operation.properties(AUTHENTICATION_FIELDS)
}

/// Authenticates a user by id as the OAuth client.
#[must_use]
pub fn client_user_authenticate_by_id(
    credentials: impl Into<ClientCredentials>,
    user_id: u64,
    auto_register: bool,
) -> Operation {
    client_user_authenticate(credentials, Some(user_id), None, auto_register)
}

/// Authenticates a user by e-mail as the OAuth client.
#[must_use]
pub fn client_user_authenticate_by_email(
    credentials: impl Into<ClientCredentials>,
    user_email: &str,
    auto_register: bool,
) -> Operation {
    client_user_authenticate(credentials, None, Some(user_email), auto_register)
}

/// Updates a user as the OAuth client. Add the fields to change as arguments.
#[must_use]
pub fn client_user_update(credentials: impl Into<ClientCredentials>, user_id: u64) -> Operation {
    Operation::mutation("ClientUserUpdate")
        .arguments(credential_arguments(credentials))
        .argument("id", user_id)
        .properties(["id", "name", "email"])
}

/// Deletes a user as the OAuth client.
#[must_use]
pub fn client_user_delete(
    credentials: impl Into<ClientCredentials>,
    user_id: u64,
    user_email: &str,
) -> Operation {
    Operation::mutation("ClientUserDelete")
        .arguments(credential_arguments(credentials))
        .argument("id", user_id)
        .argument("email", user_email)
}

/// Grants or revokes a subscription for a user as the OAuth client.
#[must_use]
pub fn client_user_subscription_entitlement_manage(
    credentials: impl Into<ClientCredentials>,
    user_id: u64,
    subscription_id: u64,
    action: EntitlementAction,
    expires_at: Option<DateTime<Utc>>,
) -> Operation {
    Operation::mutation("ClientUserSubscriptionEntitlementManage")
        .arguments(credential_arguments(credentials))
        .argument("user_id", user_id)
        .argument("subscription_id", subscription_id)
        .argument("action", action)
        .argument(
            "expires_at",
            expires_at.map(|at| at.format(EXPIRES_AT_FORMAT).to_string()),
        )
}

/// Grants or revokes a product for a user as the OAuth client.
#[must_use]
pub fn client_user_product_entitlement_manage(
    credentials: impl Into<ClientCredentials>,
    user_id: u64,
    product_id: u64,
    action: EntitlementAction,
) -> Operation {
    Operation::mutation("ClientUserProductEntitlementManage")
        .arguments(credential_arguments(credentials))
        .argument("user_id", user_id)
        .argument("product_id", product_id)
        .argument("action", action)
}

/// Requests playback of an article asset for a user as the OAuth client.
#[must_use]
pub fn client_user_article_asset_play(
    credentials: impl Into<ClientCredentials>,
    user_id: u64,
    article_id: u64,
    asset_id: u64,
) -> Operation {
    Operation::mutation("ClientUserArticleAssetPlay")
        .arguments(credential_arguments(credentials))
        .argument("user_id", user_id)
        .argument("article_id", article_id)
        .argument("asset_id", asset_id)
        .properties([
            Property::from("appa"),
            Property::from("appr"),
            Property::from("duration"),
            Property::from("aspect_ratio"),
            Property::from("time_marker_end"),
            Property::from("time_marker_intro_end"),
            Property::from("time_marker_intro_start"),
            Property::from("pulse_token"),
            Property::from(("subtitles", "id,url,locale,locale_label")),
            Property::from(("entitlements", "mime_type,manifest,expires_in,token")),
        ])
}

/// Authenticates a user with e-mail and password.
#[must_use]
pub fn user_authenticate(email: &str, password: &str) -> Operation {
    Operation::mutation("UserAuthenticate")
        .argument("email", email)
        .argument("password", password)
        .properties(AUTHENTICATION_FIELDS)
}

/// Updates the authenticated user. Add the fields to change as arguments.
#[must_use]
pub fn user_details_update() -> Operation {
    Operation::mutation("UserDetailsUpdate").properties(["id", "name", "email"])
}

fn with_optional(operation: Operation, key: &str, value: Option<&str>) -> Operation {
    match value.filter(|v| !v.is_empty()) {
        Some(value) => operation.argument(key, value),
        None => operation,
    }
}

/// Starts the purchase of a subscription.
#[must_use]
pub fn user_subscription_acquire(
    payment_provider_id: u64,
    subscription_id: u64,
    redirect_url_path: Option<&str>,
    voucher_code: Option<&str>,
) -> Operation {
    let operation = Operation::mutation("UserSubscriptionAcquire")
        .argument("payment_provider_id", payment_provider_id)
        .argument("subscription_id", subscription_id);
    let operation = with_optional(operation, "redirect_url_path", redirect_url_path);
    with_optional(operation, "voucher_code", voucher_code).properties(PAYMENT_FIELDS)
}

/// Starts the purchase of one of each of the given products.
#[must_use]
pub fn user_product_acquire(
    payment_provider_id: u64,
    product_ids: &[u64],
    redirect_url_path: Option<&str>,
    voucher_code: Option<&str>,
) -> Operation {
    let stack = product_ids
        .iter()
        .map(|id| format!("{{id:{id},purchase_num:1}}"))
        .collect::<Vec<_>>()
        .join(",");

    let operation = Operation::mutation("UserProductAcquire")
        .argument("payment_provider_id", payment_provider_id)
        .argument("product_stack", Argument::Raw(format!("[{stack}]")));
    let operation = with_optional(operation, "redirect_url_path", redirect_url_path);
    with_optional(operation, "voucher_code", voucher_code).properties(PAYMENT_FIELDS)
}

/// Redeems a voucher, optionally towards a (user) subscription.
#[must_use]
pub fn user_payment_voucher_redeem(
    voucher_code: &str,
    payment_provider_id: u64,
    redirect_url_path: Option<&str>,
    subscription_id: Option<u64>,
    user_subscription_id: Option<u64>,
) -> Operation {
    let mut operation = Operation::mutation("UserPaymentVoucherRedeem")
        .argument("code", voucher_code)
        .argument("payment_provider_id", payment_provider_id);
    operation = with_optional(operation, "redirect_url_path", redirect_url_path);
    if let Some(id) = subscription_id.filter(|id| *id > 0) {
        operation = operation.argument("subscription_id", id);
    }
    if let Some(id) = user_subscription_id.filter(|id| *id > 0) {
        operation = operation.argument("user_subscription_id", id);
    }
    operation.properties(PAYMENT_FIELDS)
}

/// Validates a payment order after the user returns from the provider.
#[must_use]
pub fn user_payment_account_order_validate(user_payment_account_order_id: u64) -> Operation {
    Operation::mutation("UserPaymentAccountOrderValidate")
        .argument("id", user_payment_account_order_id)
}

/// Pairs a device using the code it displays.
#[must_use]
pub fn user_device_pairing_claim(pairing_code: &str) -> Operation {
    Operation::mutation("UserDevicePairingClaim")
        .argument("pairing_code", Argument::String(pairing_code.to_string()))
        .properties(["id", "name", "uuid", "created_at"])
}

/// Removes a paired device.
#[must_use]
pub fn user_device_pairing_delete(device_id: u64) -> Operation {
    Operation::mutation("UserDevicePairingDelete").argument("device_id", device_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const CREDENTIALS: &str = "project_id:1,client_id:\"cid\",client_secret:\"secret\"";
    const AUTH: &str = "{access_token,user_id,user_email,expires_in}";

    fn credentials() -> ClientCredentials {
        ClientCredentials::new(
            crate::config::ProjectId::new(1).unwrap(),
            crate::config::ClientId::new("cid").unwrap(),
            crate::config::ClientSecret::new("secret").unwrap(),
        )
    }

    // === Client authentication ===

    #[test]
    fn test_admin_client_authenticate_targets_admin_endpoint() {
        let operation = admin_client_authenticate(credentials());
        assert_eq!(operation.agent_kind(), AgentKind::Client);
        assert_eq!(operation.endpoint_scope(), Scope::Admin);
        assert_eq!(
            operation.document().unwrap(),
            format!("mutation{{ClientAuthenticate({CREDENTIALS}){AUTH}}}")
        );
    }

    #[test]
    fn test_client_authenticate_targets_user_endpoint() {
        let operation = client_authenticate(credentials());
        assert_eq!(operation.agent_kind(), AgentKind::Client);
        assert_eq!(operation.endpoint_scope(), Scope::User);
    }

    // === User authentication ===

    #[test]
    fn test_client_user_authenticate_by_id_ignores_auto_register() {
        assert_eq!(
            client_user_authenticate_by_id(credentials(), 7, true).document().unwrap(),
            format!("mutation{{ClientUserAuthenticate({CREDENTIALS},user_id:7){AUTH}}}")
        );
    }

    #[test]
    fn test_client_user_authenticate_by_email_carries_auto_register() {
        assert_eq!(
            client_user_authenticate_by_email(credentials(), "a@example.com", false)
                .document()
                .unwrap(),
            format!(
                "mutation{{ClientUserAuthenticate({CREDENTIALS},user_email:\"a@example.com\",auto_register:false){AUTH}}}"
            )
        );
    }

    #[test]
    fn test_user_authenticate_document() {
        assert_eq!(
            user_authenticate("a@example.com", "pw").document().unwrap(),
            format!("mutation{{UserAuthenticate(email:\"a@example.com\",password:\"pw\"){AUTH}}}")
        );
    }

    // === Entitlements ===

    #[test]
    fn test_subscription_entitlement_with_expiry() {
        let expires_at = Utc.with_ymd_and_hms(2030, 1, 2, 3, 4, 5).unwrap();
        let document = client_user_subscription_entitlement_manage(
            credentials(),
            7,
            8,
            EntitlementAction::Fulfil,
            Some(expires_at),
        )
        .document()
        .unwrap();

        assert_eq!(
            document,
            format!(
                "mutation{{ClientUserSubscriptionEntitlementManage({CREDENTIALS},user_id:7,subscription_id:8,\
                 action:fulfil,expires_at:\"2030-01-02T03:04:05Z\")}}"
            )
        );
    }

    #[test]
    fn test_subscription_entitlement_without_expiry_sends_null() {
        let document = client_user_subscription_entitlement_manage(
            credentials(),
            7,
            8,
            EntitlementAction::Revoke,
            None,
        )
        .document()
        .unwrap();

        assert!(document.ends_with("action:revoke,expires_at:null)}"));
    }

    #[test]
    fn test_product_entitlement_document() {
        assert_eq!(
            client_user_product_entitlement_manage(credentials(), 7, 9, EntitlementAction::Revoke)
                .document()
                .unwrap(),
            format!(
                "mutation{{ClientUserProductEntitlementManage({CREDENTIALS},user_id:7,product_id:9,action:revoke)}}"
            )
        );
    }

    #[test]
    fn test_article_asset_play_selection() {
        let document = client_user_article_asset_play(credentials(), 1, 2, 3)
            .document()
            .unwrap();
        assert!(document.contains("user_id:1,article_id:2,asset_id:3)"));
        assert!(document.ends_with(
            "pulse_token,subtitles{id,url,locale,locale_label},entitlements{mime_type,manifest,expires_in,token}}}"
        ));
    }

    // === User management ===

    #[test]
    fn test_client_user_delete_has_no_selection() {
        assert_eq!(
            client_user_delete(credentials(), 4, "a@example.com").document().unwrap(),
            format!("mutation{{ClientUserDelete({CREDENTIALS},id:4,email:\"a@example.com\")}}")
        );
    }

    #[test]
    fn test_user_details_update_accepts_extra_arguments() {
        assert_eq!(
            user_details_update().argument("name", "New").document().unwrap(),
            "mutation{UserDetailsUpdate(name:\"New\"){id,name,email}}"
        );
    }

    // === Payments ===

    #[test]
    fn test_user_subscription_acquire_optional_arguments() {
        let bare = user_subscription_acquire(1, 2, None, Some("")).document().unwrap();
        assert!(bare.starts_with("mutation{UserSubscriptionAcquire(payment_provider_id:1,subscription_id:2){status,"));

        let full = user_subscription_acquire(1, 2, Some("/done"), Some("VOUCHER"))
            .document()
            .unwrap();
        assert!(full.contains("subscription_id:2,redirect_url_path:\"/done\",voucher_code:\"VOUCHER\")"));
    }

    #[test]
    fn test_user_product_acquire_builds_product_stack() {
        assert_eq!(
            user_product_acquire(1, &[5, 6], None, None).document().unwrap(),
            "mutation{UserProductAcquire(payment_provider_id:1,\
             product_stack:[{id:5,purchase_num:1},{id:6,purchase_num:1}])\
             {status,price,title,description_short,payment_url,user_payment_account_order_id}}"
        );
    }

    #[test]
    fn test_user_payment_voucher_redeem_optional_ids() {
        let document = user_payment_voucher_redeem("CODE", 1, None, Some(3), Some(0))
            .document()
            .unwrap();
        assert!(document.starts_with(
            "mutation{UserPaymentVoucherRedeem(code:\"CODE\",payment_provider_id:1,subscription_id:3){"
        ));
    }

    #[test]
    fn test_order_validate_and_device_pairing() {
        assert_eq!(
            user_payment_account_order_validate(12).document().unwrap(),
            "mutation{UserPaymentAccountOrderValidate(id:12)}"
        );
        assert_eq!(
            user_device_pairing_claim("123456").document().unwrap(),
            "mutation{UserDevicePairingClaim(pairing_code:\"123456\"){id,name,uuid,created_at}}"
        );
        assert_eq!(
            user_device_pairing_delete(4).document().unwrap(),
            "mutation{UserDevicePairingDelete(device_id:4)}"
        );
    }
}
