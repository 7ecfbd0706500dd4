//! Named operations of the AudiencePlayer API.
//!
//! Each function in [`queries`] and [`mutations`] returns a pre-populated
//! [`Operation`](crate::graphql::Operation): name, agent kind, endpoint
//! scope, default arguments and default properties. The result is an
//! ordinary builder, so any of those can still be adjusted before
//! execution.
//!
//! Operations acting on behalf of the OAuth client take
//! `impl Into<ClientCredentials>`. Pass `&ApiConfig` to use the configured
//! credentials.
//!
//! # Example
//!
//! ```rust
//! use audienceplayer::operations::{queries, ArticleType};
//!
//! let operation = queries::article_list(Some(3), &[ArticleType::Film, ArticleType::Series])
//!     .properties(["id", "name"])
//!     .paginate(25, 0);
//!
//! assert_eq!(
//!     operation.document().unwrap(),
//!     "query{ArticleList(category_id:3,types:[film,series],limit:25,offset:0)\
//!      {items{pagination{limit,offset,count,total_count,page_count,page_current},id,name}}}"
//! );
//! ```

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::config::ClientCredentials;
use crate::graphql::{Argument, Property};

pub mod mutations;
pub mod queries;

/// Fields requested for every image-like selection.
pub(crate) const IMAGE_FIELDS: &str =
    "url,base_url,base_path,file_name,file_path,aspect_ratio_profile";

/// Fields returned by the authentication mutations.
pub(crate) const AUTHENTICATION_FIELDS: [&str; 4] =
    ["access_token", "user_id", "user_email", "expires_in"];

pub(crate) fn images(name: &str) -> Property {
    Property::from((name, IMAGE_FIELDS))
}

pub(crate) fn metas() -> Property {
    Property::from(("metas(output:html)", "key,value"))
}

/// Arguments identifying the OAuth client, in the order the backend lists them.
pub(crate) fn credential_arguments(
    credentials: impl Into<ClientCredentials>,
) -> [(&'static str, Argument); 3] {
    let credentials = credentials.into();
    let client_id: &str = credentials.client_id.as_ref();
    let client_secret: &str = credentials.client_secret.as_ref();
    [
        ("project_id", Argument::from(credentials.project_id.get())),
        ("client_id", Argument::from(client_id)),
        ("client_secret", Argument::from(client_secret)),
    ]
}

/// Error returned when parsing an unknown enum literal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown {kind} '{value}'")]
pub struct UnknownValueError {
    /// What was being parsed.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

macro_rules! literal_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($(#[$variant_meta:meta])* $variant:ident => $literal:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$variant_meta])* $variant),+
        }

        impl $name {
            /// Returns the literal sent to the backend.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $literal),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownValueError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($literal => Ok(Self::$variant),)+
                    _ => Err(UnknownValueError {
                        kind: $kind,
                        value: s.to_string(),
                    }),
                }
            }
        }

        impl From<$name> for Argument {
            fn from(value: $name) -> Self {
                Self::Enum(value.as_str().to_string())
            }
        }
    };
}

literal_enum! {
    /// The kind of device a request originates from.
    PlatformContext, "platform context" {
        /// Browser.
        Web => "web",
        /// Phone or tablet app.
        Mobile => "mobile",
        /// Smart TV app.
        Tv => "tv",
        /// Metrological set-top boxes.
        Metrological => "metrological",
    }
}

literal_enum! {
    /// The distribution channel a request originates from.
    OperatorContext, "operator context" {
        /// Browser.
        Web => "web",
        /// Android app.
        Android => "android",
        /// iOS app.
        Ios => "ios",
        /// Metrological.
        Metrological => "metrological",
        /// KPN.
        Kpn => "kpn",
        /// Caiway.
        Caiway => "caiway",
        /// Delta.
        Delta => "delta",
        /// XS4ALL.
        Xs4all => "xs4all",
        /// Horizon.
        Horizon => "horizon",
        /// Ziggo.
        Ziggo => "ziggo",
    }
}

literal_enum! {
    /// Article types accepted by `ArticleList`.
    ArticleType, "article type" {
        /// A series episode.
        Episode => "episode",
        /// A feature film.
        Film => "film",
        /// A season of a series.
        Season => "season",
        /// A series.
        Series => "series",
        /// A text article.
        Text => "text",
        /// A standalone video.
        Video => "video",
    }
}

literal_enum! {
    /// Whether an entitlement is granted or withdrawn.
    EntitlementAction, "entitlement action" {
        /// Grant the entitlement.
        Fulfil => "fulfil",
        /// Withdraw the entitlement.
        Revoke => "revoke",
    }
}

impl Default for PlatformContext {
    fn default() -> Self {
        Self::Web
    }
}

impl Default for OperatorContext {
    fn default() -> Self {
        Self::Web
    }
}
