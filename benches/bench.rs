// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use criterion::*;
use crossbeam_utils::atomic::AtomicCell;
use hifitime::{Duration, Epoch};

use sunsep::{
    ephemeris::{ApparentFrame, SunEphemeris},
    parse_catalog,
    separation::compute_series,
    time::ObservationWindow,
    ObservatoryRegistry,
};

const CATALOG: &str = "
Source RA Dec Epoch
CasA 23h23m24s +58d48m54s J2000
CygA 19:59:28.36 +40:44:02.1 J2000
CenA 201.365063 -43.019112 2000.0 radio_galaxy
3C273 12h29m06.7s +02d03m09s B1950
near 90.0 23.4 J2000
";

fn window() -> ObservationWindow {
    ObservationWindow::new(
        Epoch::from_gregorian_utc_hms(2024, 6, 21, 0, 30, 0),
        4.0,
        Duration::from_seconds(60.0),
    )
    .unwrap()
}

fn ephemeris(c: &mut Criterion) {
    let gmrt = ObservatoryRegistry::builtin().get("GMRT").unwrap().clone();
    let grid = window().grid();

    c.bench_function("single apparent frame", |b| {
        b.iter(|| ApparentFrame::new(black_box(grid[0]), &gmrt))
    });

    c.bench_function("Sun ephemeris over 241 instants", |b| {
        b.iter(|| SunEphemeris::new(black_box(&grid), &gmrt))
    });
}

fn separations(c: &mut Criterion) {
    let gmrt = ObservatoryRegistry::builtin().get("GMRT").unwrap().clone();
    let sun = SunEphemeris::new(&window().grid(), &gmrt).unwrap();
    let catalog = parse_catalog(CATALOG).unwrap();
    let cancel = AtomicCell::new(false);

    c.bench_function("parse catalog", |b| {
        b.iter(|| parse_catalog(black_box(CATALOG)))
    });

    c.bench_function("separation series for 5 sources", |b| {
        b.iter(|| {
            for source in catalog.values() {
                compute_series(source, &sun, &cancel).unwrap();
            }
        })
    });
}

criterion_group!(benches, ephemeris, separations);
criterion_main!(benches);
