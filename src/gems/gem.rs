//! Gem identity and creation.

use super::errors::GemError;
use super::markup;
use super::types::{ItemStack, Material};

/// What a protection gem looks like on this server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GemSpec {
    material: Material,
    /// Rendered (normalized) display label.
    display_name: String,
}

impl GemSpec {
    /// Build from the raw configured material name and `&`-coded display name.
    pub fn new(material: &str, display_name: &str) -> Result<Self, GemError> {
        let material = Material::parse(material)?;
        if material.is_air() {
            return Err(GemError::InvalidMaterial(material.to_string()));
        }
        Ok(Self {
            material,
            display_name: markup::normalize(display_name),
        })
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Exact match on material and rendered display label.
    pub fn is_gem(&self, item: &ItemStack) -> bool {
        item.material == self.material
            && item.display_name.as_deref() == Some(self.display_name.as_str())
    }

    /// A fresh stack of `amount` gems.
    pub fn create(&self, amount: u32) -> Result<ItemStack, GemError> {
        if amount == 0 {
            return Err(GemError::EmptyStack("gem".to_string()));
        }
        Ok(ItemStack::new(self.material.clone(), amount).with_display_name(self.display_name.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> GemSpec {
        GemSpec::new("EMERALD", "&6&lProtection Gem").unwrap()
    }

    #[test]
    fn test_created_gem_is_recognised() {
        let gem = spec().create(4).unwrap();
        assert_eq!(gem.amount, 4);
        assert_eq!(gem.display_name.as_deref(), Some("§6§lProtection Gem"));
        assert!(spec().is_gem(&gem));
    }

    #[test]
    fn test_one_character_off_is_not_a_gem() {
        let item = ItemStack::new(Material::parse("EMERALD").unwrap(), 1)
            .with_display_name("§6§lProtection Gen");
        assert!(!spec().is_gem(&item));
    }

    #[test]
    fn test_unrendered_name_is_not_a_gem() {
        let item = ItemStack::new(Material::parse("EMERALD").unwrap(), 1)
            .with_display_name("&6&lProtection Gem");
        assert!(!spec().is_gem(&item));
    }

    #[test]
    fn test_wrong_material_is_not_a_gem() {
        let item = ItemStack::new(Material::parse("DIAMOND").unwrap(), 1)
            .with_display_name("§6§lProtection Gem");
        assert!(!spec().is_gem(&item));
    }

    #[test]
    fn test_plain_emerald_is_not_a_gem() {
        let item = ItemStack::new(Material::parse("EMERALD").unwrap(), 1);
        assert!(!spec().is_gem(&item));
    }

    #[test]
    fn test_air_material_rejected() {
        assert!(matches!(
            GemSpec::new("air", "x"),
            Err(GemError::InvalidMaterial(_))
        ));
    }

    #[test]
    fn test_zero_gems_rejected() {
        assert!(spec().create(0).is_err());
    }
}
