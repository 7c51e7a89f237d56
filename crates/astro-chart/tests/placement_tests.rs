use astro_chart::ephemeris::PlanetPosition;
use astro_chart::western::{house_of, place, resolve_longitude, sign_of, Sign};

fn equal_cusps(start: f64) -> [f64; 12] {
    let mut cusps = [0.0; 12];
    for (i, cusp) in cusps.iter_mut().enumerate() {
        *cusp = (start + 30.0 * i as f64) % 360.0;
    }
    cusps
}

#[test]
fn test_ninety_five_degrees_is_five_cancer() {
    let (sign, degree, house) = resolve_longitude(95.0, None);
    assert_eq!(sign, Sign::Cancer);
    assert_eq!(degree, 5.0);
    assert_eq!(house, None);
}

#[test]
fn test_sign_is_periodic() {
    let mut lon = 0.25;
    while lon < 360.0 {
        let base = sign_of(lon);
        for k in [-3.0, -1.0, 1.0, 2.0, 5.0] {
            assert_eq!(sign_of(lon + 360.0 * k), base, "lon {} k {}", lon, k);
        }
        lon += 1.5;
    }
}

#[test]
fn test_degree_in_sign_bounds_and_reconstruction() {
    let mut lon = -400.0;
    while lon < 800.0 {
        let (sign, degree, _) = resolve_longitude(lon, None);
        assert!((0.0..30.0).contains(&degree), "{} -> {}", lon, degree);
        let rebuilt = sign.index() as f64 * 30.0 + degree;
        let expected = lon.rem_euclid(360.0);
        assert!((rebuilt - expected).abs() <= 0.011, "{} -> {}", lon, rebuilt);
        lon += 3.17;
    }
}

#[test]
fn test_wrapping_twelfth_house() {
    let mut cusps = equal_cusps(20.0);
    cusps[11] = 350.0;
    assert_eq!(cusps[0], 20.0);

    assert_eq!(house_of(355.0, &cusps), Some(12));
    assert_eq!(house_of(5.0, &cusps), Some(12));
    assert_eq!(house_of(20.0, &cusps), Some(1));
    assert_eq!(house_of(349.9, &cusps), Some(11));
}

#[test]
fn test_every_longitude_lands_in_exactly_one_house() {
    let cusps = [
        345.5, 15.2, 42.8, 70.0, 101.3, 138.9, 165.5, 195.2, 222.8, 250.0, 281.3, 318.9,
    ];
    let mut lon = 0.0;
    while lon < 360.0 {
        let containing: Vec<usize> = (0..12)
            .filter(|&i| {
                let start = cusps[i];
                let end = cusps[(i + 1) % 12];
                if start < end {
                    lon >= start && lon < end
                } else {
                    lon >= start || lon < end
                }
            })
            .collect();
        assert_eq!(containing.len(), 1, "lon {}", lon);
        assert_eq!(house_of(lon, &cusps), Some(containing[0] as u8 + 1));
        lon += 0.5;
    }
}

#[test]
fn test_no_cusps_means_no_house() {
    let mut lon = 0.0;
    while lon < 360.0 {
        assert_eq!(resolve_longitude(lon, None).2, None);
        lon += 10.0;
    }
}

#[test]
fn test_retrograde_from_negative_speed() {
    let cusps = equal_cusps(0.0);
    let placement = place(
        &PlanetPosition {
            lon: 725.0,
            lat: 1.2,
            speed_lon: -0.05,
        },
        Some(&cusps),
    );
    assert!(placement.retrograde);
    assert_eq!(placement.sign, Sign::Aries);
    assert_eq!(placement.longitude, 5.0);
    assert_eq!(placement.house, Some(1));
}
