//! Reactive completion of the `cost = price × gallons` constraint.
//!
//! The entry form binds three numeric fields. Whenever one of them changes
//! and the two counterparts needed for a derivation hold positive values,
//! the dependent field is rewritten. The rewrite goes through the same
//! setter the form uses, so a `resolving` flag suppresses the nested
//! resolution that write would otherwise trigger.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FillUpField {
    PricePerGallon,
    Gallons,
    TotalCost,
}

/// Editing state of the three mutually-constrained fill-up fields.
#[derive(Clone, Debug, Default)]
pub struct FillUpForm {
    price_per_gallon: Option<f64>,
    gallons: Option<f64>,
    total_cost: Option<f64>,
    resolving: bool,
}

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v > 0.0 && v.is_finite())
}

impl FillUpForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn price_per_gallon(&self) -> Option<f64> {
        self.price_per_gallon
    }

    pub fn gallons(&self) -> Option<f64> {
        self.gallons
    }

    pub fn total_cost(&self) -> Option<f64> {
        self.total_cost
    }

    /// Write one field and resolve the dependent one.
    pub fn set(&mut self, field: FillUpField, value: f64) {
        self.store(field, Some(value));
        if self.resolving {
            return;
        }

        self.resolving = true;
        self.complete(field);
        self.resolving = false;
    }

    /// Clear one field. Clearing never cascades: the other fields keep
    /// whatever the user or the resolver last wrote.
    pub fn clear(&mut self, field: FillUpField) {
        self.store(field, None);
    }

    /// The save gate the form binds its submit button to: all three
    /// fields resolved positive and the odometer strictly increasing.
    pub fn can_save(&self, current_miles: f64, previous_miles: f64) -> bool {
        positive(self.price_per_gallon).is_some()
            && positive(self.gallons).is_some()
            && positive(self.total_cost).is_some()
            && previous_miles >= 0.0
            && current_miles > previous_miles
    }

    fn store(&mut self, field: FillUpField, value: Option<f64>) {
        match field {
            FillUpField::PricePerGallon => self.price_per_gallon = value,
            FillUpField::Gallons => self.gallons = value,
            FillUpField::TotalCost => self.total_cost = value,
        }
    }

    /// Derive the field implied by the change. Preference order mirrors the
    /// form: price and gallons produce the cost; a cost edit adjusts
    /// whichever quantity the remaining field allows.
    fn complete(&mut self, changed: FillUpField) {
        match changed {
            FillUpField::PricePerGallon => {
                let Some(price) = positive(self.price_per_gallon) else {
                    return;
                };
                if let Some(gallons) = positive(self.gallons) {
                    self.set(FillUpField::TotalCost, price * gallons);
                } else if let Some(cost) = positive(self.total_cost) {
                    self.set(FillUpField::Gallons, cost / price);
                }
            }
            FillUpField::Gallons => {
                let Some(gallons) = positive(self.gallons) else {
                    return;
                };
                if let Some(price) = positive(self.price_per_gallon) {
                    self.set(FillUpField::TotalCost, price * gallons);
                } else if let Some(cost) = positive(self.total_cost) {
                    self.set(FillUpField::PricePerGallon, cost / gallons);
                }
            }
            FillUpField::TotalCost => {
                let Some(cost) = positive(self.total_cost) else {
                    return;
                };
                if let Some(price) = positive(self.price_per_gallon) {
                    self.set(FillUpField::Gallons, cost / price);
                } else if let Some(gallons) = positive(self.gallons) {
                    self.set(FillUpField::PricePerGallon, cost / gallons);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_and_gallons_produce_cost() {
        let mut form = FillUpForm::new();
        form.set(FillUpField::PricePerGallon, 3.50);
        form.set(FillUpField::Gallons, 10.0);

        assert_eq!(form.total_cost(), Some(35.0));
    }

    #[test]
    fn cost_and_price_produce_gallons() {
        let mut form = FillUpForm::new();
        form.set(FillUpField::TotalCost, 35.0);
        form.set(FillUpField::PricePerGallon, 3.50);

        assert_eq!(form.gallons(), Some(10.0));
    }

    #[test]
    fn cost_and_gallons_produce_price() {
        let mut form = FillUpForm::new();
        form.set(FillUpField::Gallons, 10.0);
        form.set(FillUpField::TotalCost, 35.0);

        assert_eq!(form.price_per_gallon(), Some(3.5));
    }

    #[test]
    fn derived_write_does_not_cascade() {
        let mut form = FillUpForm::new();
        form.set(FillUpField::TotalCost, 40.0);
        form.set(FillUpField::PricePerGallon, 4.0);
        // The resolver wrote gallons = 10; that write must not have turned
        // around and rewritten the cost the user just entered.
        assert_eq!(form.gallons(), Some(10.0));
        assert_eq!(form.total_cost(), Some(40.0));
        assert_eq!(form.price_per_gallon(), Some(4.0));
    }

    #[test]
    fn editing_a_field_rederives() {
        let mut form = FillUpForm::new();
        form.set(FillUpField::PricePerGallon, 3.0);
        form.set(FillUpField::Gallons, 10.0);
        assert_eq!(form.total_cost(), Some(30.0));

        form.set(FillUpField::Gallons, 12.0);
        assert_eq!(form.total_cost(), Some(36.0));
    }

    #[test]
    fn single_field_resolves_nothing() {
        let mut form = FillUpForm::new();
        form.set(FillUpField::PricePerGallon, 3.0);

        assert_eq!(form.gallons(), None);
        assert_eq!(form.total_cost(), None);
    }

    #[test]
    fn non_positive_operands_are_ignored() {
        let mut form = FillUpForm::new();
        form.set(FillUpField::Gallons, 0.0);
        form.set(FillUpField::PricePerGallon, 3.0);

        assert_eq!(form.total_cost(), None);
    }

    #[test]
    fn clear_does_not_cascade() {
        let mut form = FillUpForm::new();
        form.set(FillUpField::PricePerGallon, 3.0);
        form.set(FillUpField::Gallons, 10.0);

        form.clear(FillUpField::Gallons);
        assert_eq!(form.gallons(), None);
        assert_eq!(form.total_cost(), Some(30.0));
        assert_eq!(form.price_per_gallon(), Some(3.0));
    }

    #[test]
    fn save_gate() {
        let mut form = FillUpForm::new();
        form.set(FillUpField::PricePerGallon, 3.0);
        assert!(!form.can_save(10_500.0, 10_200.0));

        form.set(FillUpField::Gallons, 10.0);
        assert!(form.can_save(10_500.0, 10_200.0));
        assert!(!form.can_save(10_200.0, 10_200.0));
        assert!(!form.can_save(10_500.0, -1.0));
    }
}
