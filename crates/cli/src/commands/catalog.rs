//! Catalog listing command.

use std::fmt::Write as _;

use corner_shop_core::Catalog;

/// Print the built-in catalog grouped by category.
pub fn list() {
    #[allow(clippy::print_stdout)]
    {
        print!("{}", render(&Catalog::builtin()));
    }
}

/// Render a catalog as indented text, one heading per category.
fn render(catalog: &Catalog) -> String {
    let mut out = String::new();
    for (category, products) in catalog.categories() {
        let _ = writeln!(out, "{}", category.title());
        for product in products {
            let _ = writeln!(
                out,
                "  {:<8} {:<20} {:>8}",
                product.id,
                product.name,
                product.display_price()
            );
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_uses_category_titles() {
        let text = render(&Catalog::builtin());
        assert!(text.contains("hot drinks\n"));
        assert!(text.contains("baked goods\n"));
        assert!(!text.contains("hot_drinks"));
    }

    #[test]
    fn test_render_lists_every_product() {
        let catalog = Catalog::builtin();
        let text = render(&catalog);
        for product in catalog.flat_products() {
            assert!(text.contains(&product.name));
        }
        assert!(text.contains("$2.50"));
    }

    #[test]
    fn test_render_empty_catalog() {
        assert!(render(&Catalog::default()).is_empty());
    }
}
