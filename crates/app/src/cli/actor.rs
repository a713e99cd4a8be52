use clap::Args;
use reserva::identity::{ClaimValue, Claims, Principal};
use reserva_app::policy::ReservationPolicy;

/// Identity a command acts under, checked against the email-domain allow-list.
#[derive(Debug, Args)]
pub(crate) struct ActorArgs {
    /// Email of the acting user
    #[arg(long, env = "ACTOR_EMAIL")]
    pub actor_email: String,

    /// Role claim of the acting user (user, admin); defaults to user
    #[arg(long, env = "ACTOR_ROLE")]
    pub actor_role: Option<String>,
}

impl ActorArgs {
    fn claims(&self) -> Claims {
        let mut claims = Claims::default();

        claims.insert(
            "email".to_string(),
            ClaimValue::Single(self.actor_email.clone()),
        );

        if let Some(role) = &self.actor_role {
            claims.insert("roles".to_string(), ClaimValue::Single(role.clone()));
        }

        claims
    }

    pub(crate) fn resolve(&self, policy: &ReservationPolicy) -> Result<Principal, String> {
        policy
            .authorize(&self.claims())
            .map_err(|error| format!("actor rejected: {error}"))
    }
}
