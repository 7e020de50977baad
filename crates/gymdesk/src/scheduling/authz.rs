use super::domain::Role;

/// What a role may set on an appointment. Consumed once by the booking
/// service instead of branching on the role at every protected field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// May set or change the approved flag.
    pub can_set_approval: bool,
    /// May create or touch appointments owned by any member.
    pub can_set_arbitrary_owner: bool,
}

pub fn capabilities_for(role: Role) -> Capabilities {
    match role {
        Role::Admin => Capabilities {
            can_set_approval: true,
            can_set_arbitrary_owner: true,
        },
        Role::Member => Capabilities {
            can_set_approval: false,
            can_set_arbitrary_owner: false,
        },
    }
}
