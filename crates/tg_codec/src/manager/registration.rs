use crate::TypeManager;

// -----------------------------------------------------------------------------
// TypeRegistration

/// Configuration submitted at link time and applied by
/// [`TypeManager::auto_register`].
///
/// Submitted with [`inventory::submit!`]:
///
/// ```no_run
/// use tg_codec::{TypeManager, TypeRegistration};
///
/// struct Invoice;
///
/// fn register_invoice(manager: &mut TypeManager) {
///     manager.configure::<Invoice>(|t| {
///         t.alias("Invoice").property("total", |p| { p.ty::<f64>(); });
///     });
/// }
///
/// tg_codec::inventory::submit! {
///     TypeRegistration::new(register_invoice)
/// }
///
/// let mut manager = TypeManager::new();
/// manager.auto_register();
/// assert!(manager.resolve_alias("Invoice").is_some());
/// ```
pub struct TypeRegistration {
    configure: fn(&mut TypeManager),
}

impl TypeRegistration {
    #[inline]
    pub const fn new(configure: fn(&mut TypeManager)) -> Self {
        Self { configure }
    }
}

inventory::collect!(TypeRegistration);

impl TypeManager {
    /// Applies every submitted [`TypeRegistration`], returning how many ran.
    ///
    /// Registrations run in an unspecified order. Calling this again applies
    /// them again, which is harmless for plain configuration.
    ///
    /// Supported platforms are those of the `inventory` crate; elsewhere no
    /// registration is found.
    pub fn auto_register(&mut self) -> usize {
        let mut count = 0;
        for registration in inventory::iter::<TypeRegistration> {
            (registration.configure)(self);
            count += 1;
        }
        log::debug!("applied {count} type registrations");
        count
    }
}
