pub mod d400_billing_overview;
