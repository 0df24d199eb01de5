//! Property-based tests for the PNG predictor codec
//!
//! The encoder and decoder must agree for every tag, every strategy and
//! arbitrary row geometry.

use proptest::prelude::*;
use scribe_pdf::error::PdfError;
use scribe_pdf::filters::predictor::paeth;
use scribe_pdf::filters::{decode_rows, encode_rows, PredictorStrategy, PredictorTag};

// Strategy for whole-row sample data together with its row width
prop_compose! {
    fn rows_strategy()(bytes_per_row in 1usize..16, rows in 0usize..12)(
        data in prop::collection::vec(any::<u8>(), bytes_per_row * rows),
        bytes_per_row in Just(bytes_per_row)
    ) -> (Vec<u8>, usize) {
        (data, bytes_per_row)
    }
}

fn strategy_strategy() -> impl Strategy<Value = PredictorStrategy> {
    prop_oneof![
        Just(PredictorStrategy::Adaptive),
        prop::sample::select(PredictorTag::ALL.to_vec()).prop_map(PredictorStrategy::Fixed),
    ]
}

proptest! {
    #[test]
    fn test_encode_then_decode_restores_rows(
        (data, bytes_per_row) in rows_strategy(),
        strategy in strategy_strategy()
    ) {
        let encoded = encode_rows(&data, bytes_per_row, strategy).unwrap();
        prop_assert_eq!(encoded.len(), data.len() + data.len() / bytes_per_row);

        let decoded = decode_rows(&encoded, bytes_per_row).unwrap();
        prop_assert_eq!(decoded, data);
    }

    #[test]
    fn test_tag_zero_is_identity((data, bytes_per_row) in rows_strategy()) {
        let tagged: Vec<u8> = data
            .chunks(bytes_per_row)
            .flat_map(|row| std::iter::once(0).chain(row.iter().copied()))
            .collect();
        prop_assert_eq!(decode_rows(&tagged, bytes_per_row).unwrap(), data);
    }

    #[test]
    fn test_unknown_tag_rejected(tag in 5u8..=255, row in prop::collection::vec(any::<u8>(), 4)) {
        let mut data = vec![tag];
        data.extend_from_slice(&row);

        let err = decode_rows(&data, 4).unwrap_err();
        prop_assert!(err.is_format_error());
        let is_tag_error = matches!(err, PdfError::InvalidPredictorTag { row: 0, tag: found } if found == tag);
        prop_assert!(is_tag_error);
    }

    #[test]
    fn test_partial_row_rejected(bytes_per_row in 1usize..16, extra in 1usize..16) {
        prop_assume!(extra % (bytes_per_row + 1) != 0);
        let data = vec![0u8; extra];
        prop_assert!(decode_rows(&data, bytes_per_row).is_err());
    }

    #[test]
    fn test_paeth_returns_a_neighbour(a in any::<u8>(), b in any::<u8>(), c in any::<u8>()) {
        let predicted = paeth(a, b, c);
        prop_assert!(predicted == a || predicted == b || predicted == c);
    }
}
