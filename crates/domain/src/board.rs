use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use grantdeck_core::{AppError, AppResult};
use serde::Serialize;

use crate::{
    Grant, GrantAction, GrantSet, ModuleKey, PermissionCatalog, PermissionChange, PermissionId,
    PermissionName, ToggleEvent, ToggleState,
};

/// `active/total` counter of one module card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ModuleCounter {
    /// Permissions counted as granted.
    pub active: usize,
    /// Permissions in the module.
    pub total: usize,
}

impl Display for ModuleCounter {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}/{}", self.active, self.total)
    }
}

/// Toggle of one catalog permission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleSlot {
    module: ModuleKey,
    permission_id: Option<PermissionId>,
    state: ToggleState,
    staged: Option<Grant>,
}

impl ToggleSlot {
    /// Owning module.
    #[must_use]
    pub fn module(&self) -> &ModuleKey {
        &self.module
    }

    /// Current state machine state.
    #[must_use]
    pub fn state(&self) -> ToggleState {
        self.state
    }

    /// Local batch edit not yet saved.
    #[must_use]
    pub fn staged(&self) -> Option<Grant> {
        self.staged
    }

    /// Grant this toggle contributes to its module counter.
    #[must_use]
    pub fn counted(&self) -> Grant {
        self.staged.unwrap_or_else(|| self.state.resolved())
    }

    /// Position the control shows.
    #[must_use]
    pub fn position(&self) -> Grant {
        self.staged.unwrap_or_else(|| self.state.position())
    }

    /// Whether the control accepts input.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        !self.state.is_pending()
    }
}

/// Toggle state of every permission of one subject.
///
/// Counters are never cached: [`ToggleBoard::counter`] rescans the module on
/// every call so that commits, rollbacks, and staged edits can never drift
/// apart from what is displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleBoard {
    catalog: PermissionCatalog,
    slots: BTreeMap<PermissionName, ToggleSlot>,
    untracked_grants: GrantSet,
}

impl ToggleBoard {
    /// Builds the initial board from a fetched catalog and grant set.
    #[must_use]
    pub fn new(catalog: PermissionCatalog, grants: &GrantSet) -> Self {
        let slots = catalog
            .definitions()
            .map(|definition| {
                (
                    definition.name.clone(),
                    ToggleSlot {
                        module: definition.module.clone(),
                        permission_id: definition.id.clone(),
                        state: ToggleState::Committed(Grant::from_checked(
                            grants.contains(&definition.name),
                        )),
                        staged: None,
                    },
                )
            })
            .collect::<BTreeMap<_, _>>();

        let untracked_grants = grants
            .iter()
            .filter(|name| !slots.contains_key(*name))
            .cloned()
            .collect();

        Self {
            catalog,
            slots,
            untracked_grants,
        }
    }

    /// Catalog the board was built from.
    #[must_use]
    pub fn catalog(&self) -> &PermissionCatalog {
        &self.catalog
    }

    /// Looks up the toggle of `name`.
    pub fn slot(&self, name: &PermissionName) -> AppResult<&ToggleSlot> {
        self.slots.get(name).ok_or_else(|| {
            AppError::NotFound(format!("permission '{name}' is not in the catalog"))
        })
    }

    /// Applies one state machine event to a toggle.
    ///
    /// A rejected event leaves the board untouched.
    pub fn apply(&mut self, name: &PermissionName, event: ToggleEvent) -> AppResult<ToggleState> {
        let slot = self.slot_mut(name)?;
        let next = slot.state.apply(event)?;
        slot.state = next;
        if matches!(event, ToggleEvent::Flip | ToggleEvent::Overwrite(_)) {
            slot.staged = None;
        }

        Ok(next)
    }

    /// Moves a control locally for a later batch save.
    pub fn stage(&mut self, name: &PermissionName, grant: Grant) -> AppResult<()> {
        let slot = self.slot_mut(name)?;
        if slot.state.is_pending() {
            return Err(AppError::Conflict(format!(
                "permission '{name}' has a change in flight"
            )));
        }

        slot.staged = (slot.state.resolved() != grant).then_some(grant);
        Ok(())
    }

    /// Drops the staged edit of one toggle; returns whether one existed.
    pub fn unstage(&mut self, name: &PermissionName) -> AppResult<bool> {
        Ok(self.slot_mut(name)?.staged.take().is_some())
    }

    /// Drops every staged edit.
    pub fn clear_staged(&mut self) {
        for slot in self.slots.values_mut() {
            slot.staged = None;
        }
    }

    /// Recomputes one module's counter by scanning its toggles.
    #[must_use]
    pub fn counter(&self, module: &ModuleKey) -> ModuleCounter {
        let Some(definitions) = self.catalog.module(module) else {
            return ModuleCounter::default();
        };

        let active = definitions
            .iter()
            .filter_map(|definition| self.slots.get(&definition.name))
            .filter(|slot| slot.counted().is_granted())
            .count();

        ModuleCounter {
            active,
            total: definitions.len(),
        }
    }

    /// Counters of every module in catalog order.
    #[must_use]
    pub fn counters(&self) -> Vec<(ModuleKey, ModuleCounter)> {
        self.catalog
            .modules()
            .map(|(module, _)| (module.clone(), self.counter(module)))
            .collect()
    }

    /// Returns true while any toggle waits for the authority.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.slots.values().any(|slot| slot.state.is_pending())
    }

    /// Returns true when any control was moved locally.
    #[must_use]
    pub fn has_staged(&self) -> bool {
        self.slots.values().any(|slot| slot.staged.is_some())
    }

    /// Builds the mutation that moves `name` to `target`.
    pub fn change_for(&self, name: &PermissionName, target: Grant) -> AppResult<PermissionChange> {
        let slot = self.slot(name)?;
        Ok(PermissionChange {
            permission_name: name.clone(),
            permission_id: slot.permission_id.clone(),
            action: GrantAction::toward(target),
        })
    }

    /// Snapshots every control position as one batch, in catalog order.
    ///
    /// The snapshot describes the full desired state rather than a diff
    /// against committed values.
    #[must_use]
    pub fn snapshot_changes(&self) -> Vec<PermissionChange> {
        self.catalog
            .definitions()
            .filter_map(|definition| {
                self.slots
                    .get(&definition.name)
                    .map(|slot| PermissionChange {
                        permission_name: definition.name.clone(),
                        permission_id: slot.permission_id.clone(),
                        action: GrantAction::toward(slot.position()),
                    })
            })
            .collect()
    }

    /// Commits an acknowledged batch.
    ///
    /// Every change is validated before any toggle is touched.
    pub fn commit_changes(&mut self, changes: &[PermissionChange]) -> AppResult<()> {
        for change in changes {
            let slot = self.slot(&change.permission_name)?;
            if slot.state.is_pending() {
                return Err(AppError::Conflict(format!(
                    "permission '{}' has a change in flight",
                    change.permission_name
                )));
            }
        }

        for change in changes {
            self.apply(
                &change.permission_name,
                ToggleEvent::Overwrite(change.action.target()),
            )?;
        }

        Ok(())
    }

    /// Grants last confirmed by the authority.
    #[must_use]
    pub fn committed_grants(&self) -> GrantSet {
        let mut grants = self.untracked_grants.clone();
        for (name, slot) in &self.slots {
            grants.set(name.clone(), slot.state.resolved());
        }

        grants
    }

    fn slot_mut(&mut self, name: &PermissionName) -> AppResult<&mut ToggleSlot> {
        self.slots.get_mut(name).ok_or_else(|| {
            AppError::NotFound(format!("permission '{name}' is not in the catalog"))
        })
    }
}
